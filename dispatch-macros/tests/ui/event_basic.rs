use dispatch_domain::Event;
use dispatch_macros::event;

#[event]
struct CacheInvalidated;

#[event(name = "user.signed_in")]
struct UserSignedIn {
    user_id: String,
}

fn main() {
    assert_eq!(CacheInvalidated::NAME, "CacheInvalidated");
    assert_eq!(<UserSignedIn as Event>::NAME, "user.signed_in");

    let e = UserSignedIn {
        user_id: "u-1".into(),
    };
    let _ = format!("{:?} {:?}", e.clone(), CacheInvalidated);
}
