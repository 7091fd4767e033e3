pub mod firebase;

pub use firebase::FirebaseClient;
