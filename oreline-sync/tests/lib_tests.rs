use oreline_sync::{SyncConfig, SyncFacade};
use oreline_types::UserId;

#[test]
fn facade_creation() {
    let user = UserId::from("user-1");
    let facade = SyncFacade::new(user.clone(), SyncConfig::default());

    assert_eq!(facade.local_user(), &user);
}

#[test]
fn default_config() {
    let config = SyncConfig::default();
    assert_eq!(config.default_limit, 10);
    assert!(config.suppress_self_echo);
}
