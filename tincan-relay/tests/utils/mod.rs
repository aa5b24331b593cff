mod call_helpers;

pub use call_helpers::establish_call;
pub use test_client::TestClient;
