use fixgen::{Builder, Fixture};

#[derive(Debug, Default, Fixture)]
struct Audit {
    author: String,
}

#[derive(Debug, Default, Fixture)]
struct Ledger {
    #[fixture(extends)]
    audit: Audit,
    #[fixture(mutator = "set_balance_cents")]
    balance: i64,
    #[fixture(skip)]
    cache: Vec<u8>,
}

impl Ledger {
    fn set_balance_cents(&mut self, cents: i64) {
        self.balance = cents * 100;
    }
}

#[derive(Debug, Fixture)]
#[fixture(constructor = "Sealed::fresh")]
struct Sealed {
    seal: u32,
}

impl Sealed {
    fn fresh() -> Self {
        Self { seal: 0 }
    }
}

#[derive(Debug, Fixture)]
#[fixture(no_default)]
struct Opaque {
    _inner: u8,
}

fn main() {
    let ledger = Builder::<Ledger>::new().with_long_default(2).build();
    assert!(matches!(ledger, Some(Ledger { balance: 200, .. })));
    assert!(Builder::<Sealed>::new().build().is_some());
    assert!(Builder::<Opaque>::new().build().is_none());
}
