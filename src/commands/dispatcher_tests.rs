use super::*;
use crate::commands::Player;
use crate::database::{BackendKind, RankStore, SqliteBackend};
use uuid::Uuid;

const LABEL: &str = "premium";

struct TestActor {
    permissions: Vec<Permission>,
    player: Option<Player>,
}

impl TestActor {
    fn player(name: &str, permissions: &[Permission]) -> Self {
        Self {
            permissions: permissions.to_vec(),
            player: Some(Player::new(name, Uuid::new_v4())),
        }
    }

    fn console(permissions: &[Permission]) -> Self {
        Self {
            permissions: permissions.to_vec(),
            player: None,
        }
    }
}

impl Actor for TestActor {
    fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    fn as_player(&self) -> Option<&Player> {
        self.player.as_ref()
    }
}

struct Online(Vec<Player>);

impl PlayerDirectory for Online {
    fn find_online(&self, name: &str) -> Option<Player> {
        self.0
            .iter()
            .find(|player| player.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online_names(&self) -> Vec<String> {
        self.0.iter().map(|player| player.name.clone()).collect()
    }
}

fn memory_store() -> RankStore {
    RankStore::with_backend(
        BackendKind::Sqlite,
        Box::new(SqliteBackend::in_memory().unwrap()),
    )
}

#[test]
fn test_end_to_end_upgrade_and_get() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let admin = TestActor::console(&[Permission::Create]);
    let steve = TestActor::player(
        "Steve",
        &[Permission::Upgrade, Permission::GetSelf],
    );

    assert_eq!(
        dispatcher.dispatch(&admin, LABEL, &["create", "vip"]),
        Outcome::Created {
            category: "vip".to_string()
        }
    );
    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["upgrade", "vip"]),
        Outcome::Upgraded {
            category: "vip".to_string(),
            rank: 1
        }
    );
    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["upgrade", "vip"]),
        Outcome::Upgraded {
            category: "vip".to_string(),
            rank: 2
        }
    );
    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["get", "vip"]),
        Outcome::Rank {
            player: None,
            category: "vip".to_string(),
            rank: 2
        }
    );
}

#[test]
fn test_upgrade_unknown_category() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let steve = TestActor::player("Steve", &[Permission::Upgrade]);

    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["upgrade", "gold"]),
        Outcome::UnknownCategory
    );
    assert!(!store.rank_table_exists("gold"));
}

#[test]
fn test_missing_table_and_missing_row_look_the_same() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let steve = TestActor::player("Steve", &[Permission::GetSelf]);

    let no_table = dispatcher.dispatch(&steve, LABEL, &["get", "vip"]);
    store.create_rank_table("vip");
    let no_row = dispatcher.dispatch(&steve, LABEL, &["get", "vip"]);

    assert_eq!(no_table, Outcome::NoSuchRank);
    assert_eq!(no_row, no_table);
    assert_eq!(no_row.to_string(), "You don't have this rank.");
}

#[test]
fn test_get_other_player() {
    let store = memory_store();
    let alex = Player::new("Alex", Uuid::new_v4());
    let online = Online(vec![alex.clone()]);
    let dispatcher = Dispatcher::new(&store, &online);
    let moderator = TestActor::console(&[Permission::GetOthers]);

    store.create_rank_table("vip");
    assert_eq!(
        dispatcher.dispatch(&moderator, LABEL, &["get", "alex", "vip"]),
        Outcome::NoSuchRank
    );

    store.upgrade_rank(&alex.id.to_string(), "vip");
    let outcome = dispatcher.dispatch(&moderator, LABEL, &["get", "alex", "vip"]);
    assert_eq!(
        outcome,
        Outcome::Rank {
            player: Some("Alex".to_string()),
            category: "vip".to_string(),
            rank: 1
        }
    );
    assert_eq!(outcome.to_string(), "Alex's vip rank: 1");
}

#[test]
fn test_get_offline_player() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let moderator = TestActor::console(&[Permission::GetOthers]);

    assert_eq!(
        dispatcher.dispatch(&moderator, LABEL, &["get", "Herobrine", "vip"]),
        Outcome::PlayerNotFound("Herobrine".to_string())
    );
}

#[test]
fn test_permission_checked_before_store() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let nobody = TestActor::player("Steve", &[]);

    assert_eq!(
        dispatcher.dispatch(&nobody, LABEL, &["create", "vip"]),
        Outcome::NoPermission(Permission::Create)
    );
    assert!(!store.rank_table_exists("vip"));
    assert_eq!(
        dispatcher.dispatch(&nobody, LABEL, &["upgrade", "vip"]),
        Outcome::NoPermission(Permission::Upgrade)
    );
    assert_eq!(
        dispatcher.dispatch(&nobody, LABEL, &["get", "vip"]),
        Outcome::NoPermission(Permission::GetSelf)
    );
    assert_eq!(
        dispatcher.dispatch(&nobody, LABEL, &["get", "Alex", "vip"]),
        Outcome::NoPermission(Permission::GetOthers)
    );
    assert_eq!(
        Outcome::NoPermission(Permission::Create).to_string(),
        "You don't have permission: mcengine.premium.rank.create"
    );
}

#[test]
fn test_console_cannot_run_player_commands() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let console = TestActor::console(&Permission::ALL);

    assert_eq!(
        dispatcher.dispatch(&console, LABEL, &["upgrade", "vip"]),
        Outcome::PlayersOnly("/premium upgrade <rankType>".to_string())
    );
    assert_eq!(
        dispatcher.dispatch(&console, LABEL, &["get", "vip"]),
        Outcome::PlayersOnly("/premium get <rankType>".to_string())
    );
}

#[test]
fn test_wrong_argument_counts_show_usage() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let steve = TestActor::player("Steve", &Permission::ALL);

    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["create"]).to_string(),
        "Usage: /premium create <rankType>"
    );
    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &["upgrade"]),
        Outcome::Usage(vec!["/premium upgrade <rankType>".to_string()])
    );
    assert_eq!(
        dispatcher.dispatch(&steve, "rank", &["get"]).to_string(),
        "Usage:\n  /rank get <rankType>\n  /rank get <playerOnline> <rankType>"
    );
    assert!(matches!(
        dispatcher.dispatch(&steve, LABEL, &["get", "a", "b", "c"]),
        Outcome::Usage(lines) if lines.len() == 2
    ));
}

#[test]
fn test_help_lists_only_permitted_commands() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let steve = TestActor::player("Steve", &[Permission::GetSelf, Permission::Upgrade]);

    assert_eq!(
        dispatcher.dispatch(&steve, LABEL, &[]),
        Outcome::Help(vec![
            "/premium upgrade <rankType>".to_string(),
            "/premium get <rankType>".to_string(),
        ])
    );
}

#[test]
fn test_unknown_subcommand_is_followed_by_help() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let admin = TestActor::console(&[Permission::Create]);

    let outcome = dispatcher.dispatch(&admin, LABEL, &["Reset", "vip"]);
    assert_eq!(
        outcome.to_string(),
        "Unknown subcommand: reset\nPremium commands:\n  /premium create <rankType>"
    );
}

#[test]
fn test_subcommands_ignore_case() {
    let store = memory_store();
    let online = Online(vec![]);
    let dispatcher = Dispatcher::new(&store, &online);
    let admin = TestActor::console(&[Permission::Create]);

    assert!(matches!(
        dispatcher.dispatch(&admin, LABEL, &["CREATE", "Vip"]),
        Outcome::Created { .. }
    ));
    assert!(store.rank_table_exists("vip"));
}
