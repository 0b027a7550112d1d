use dispatch_domain::Event;
use dispatch_macros::event;

#[event(name = "envelope")]
struct Envelope<T: Send + 'static> {
    payload: T,
}

fn main() {
    assert_eq!(<Envelope<u32> as Event>::NAME, "envelope");
    let e = Envelope { payload: 7u32 };
    assert_eq!(e.clone().payload, 7);
}
