use fixgen::{fixture_proxy, Builder};

#[fixture_proxy]
pub trait Inbox {
    fn unread(&self) -> u32;
    fn subject(&self, index: usize) -> String;
    fn mark_read(&mut self, index: usize);
}

fn main() {
    let mut inbox = Builder::<Box<dyn Inbox>>::new().build().unwrap();
    inbox.mark_read(0);
    assert_eq!(inbox.unread(), 1);
    assert_eq!(inbox.subject(0), "text");
}
