use rusqlite::{params, Connection};
use shoplist_core::config::DEFAULT_SHARE_CODE_TTL_MS;
use shoplist_core::db::open_db_in_memory;
use shoplist_core::model::now_epoch_ms;
use shoplist_core::{
    CodeGenerator, InviteService, ListService, RepoError, ShareCodePolicy, ShoplistError,
    SqliteInviteRepository, SqliteListRepository,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use uuid::Uuid;

struct ScriptedCodes(RefCell<VecDeque<&'static str>>);

impl ScriptedCodes {
    fn new(codes: &[&'static str]) -> Self {
        Self(RefCell::new(codes.iter().copied().collect()))
    }
}

impl CodeGenerator for ScriptedCodes {
    fn generate(&self) -> String {
        let mut codes = self.0.borrow_mut();
        let next = codes.pop_front().unwrap_or("ZZZZZZ");
        if codes.is_empty() {
            codes.push_back(next);
        }
        next.to_string()
    }
}

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn list_service(conn: &Connection) -> ListService<SqliteListRepository<'_>> {
    ListService::new(SqliteListRepository::try_new(conn).unwrap())
}

fn invite_service(
    conn: &Connection,
) -> InviteService<SqliteListRepository<'_>, SqliteInviteRepository<'_>> {
    InviteService::new(
        SqliteListRepository::try_new(conn).unwrap(),
        SqliteInviteRepository::try_new(conn).unwrap(),
    )
}

fn scripted_service<'conn>(
    conn: &'conn Connection,
    codes: &[&'static str],
) -> InviteService<SqliteListRepository<'conn>, SqliteInviteRepository<'conn>, ScriptedCodes> {
    invite_service(conn).with_generator(ScriptedCodes::new(codes))
}

fn code_rows(conn: &Connection, list_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM invite_codes WHERE list_id = ?1;",
        [list_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn issued_code_is_six_uppercase_alphanumerics_valid_for_a_day() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();
    let invites = invite_service(&conn);

    let before = now_epoch_ms();
    let share = invites.request_share_code(owner, list_id).unwrap();
    let after = now_epoch_ms();

    assert_eq!(share.list_id, list_id);
    assert_eq!(share.code.len(), 6);
    assert!(share
        .code
        .chars()
        .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()));
    assert!(share.expires_at >= before + DEFAULT_SHARE_CODE_TTL_MS);
    assert!(share.expires_at <= after + DEFAULT_SHARE_CODE_TTL_MS);
    assert!(share.is_active_at(after));
    assert!(!share.is_active_at(share.expires_at));
}

#[test]
fn reissuing_supersedes_previous_code() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();
    let invites = scripted_service(&conn, &["FIRST1", "SECND2"]);

    let first = invites.request_share_code(owner, list_id).unwrap();
    let second = invites.request_share_code(owner, list_id).unwrap();

    assert_eq!(first.code, "FIRST1");
    assert_eq!(second.code, "SECND2");
    assert_eq!(code_rows(&conn, list_id), 1);
    assert_eq!(
        invites.current_share_code(owner, list_id).unwrap(),
        Some(second)
    );
    assert!(matches!(
        invites.join(Uuid::new_v4(), "FIRST1"),
        Err(ShoplistError::InvalidCode)
    ));
}

#[test]
fn issuance_is_owner_only_and_hidden_from_strangers() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();
    conn.execute(
        "INSERT INTO memberships (list_id, collaborator_id, joined_at) VALUES (?1, ?2, ?3);",
        params![list_id, guest.to_string(), i64::MAX],
    )
    .unwrap();
    let invites = invite_service(&conn);

    assert!(matches!(
        invites.request_share_code(guest, list_id),
        Err(ShoplistError::NotOwner(_))
    ));
    assert!(matches!(
        invites.revoke_share_code(guest, list_id),
        Err(ShoplistError::NotOwner(_))
    ));
    assert!(matches!(
        invites.current_share_code(guest, list_id),
        Err(ShoplistError::NotOwner(_))
    ));
    assert!(matches!(
        invites.request_share_code(Uuid::new_v4(), list_id),
        Err(ShoplistError::NotFound(_))
    ));
    assert_eq!(code_rows(&conn, list_id), 0);
}

#[test]
fn colliding_candidate_is_regenerated() {
    let conn = setup();
    let lists = list_service(&conn);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_list = lists.create_list(alice, "Alice").unwrap();
    let bob_list = lists.create_list(bob, "Bob").unwrap();

    scripted_service(&conn, &["SAME01"])
        .request_share_code(alice, alice_list)
        .unwrap();
    let bob_code = scripted_service(&conn, &["SAME01", "OTHER2"])
        .request_share_code(bob, bob_list)
        .unwrap();

    assert_eq!(bob_code.code, "OTHER2");
    let alice_code = invite_service(&conn)
        .current_share_code(alice, alice_list)
        .unwrap()
        .unwrap();
    assert_eq!(alice_code.code, "SAME01");
}

#[test]
fn issuance_gives_up_after_max_attempts() {
    let conn = setup();
    let lists = list_service(&conn);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_list = lists.create_list(alice, "Alice").unwrap();
    let bob_list = lists.create_list(bob, "Bob").unwrap();
    scripted_service(&conn, &["TAKEN1"])
        .request_share_code(alice, alice_list)
        .unwrap();

    let err = scripted_service(&conn, &["TAKEN1"])
        .with_policy(ShareCodePolicy {
            max_attempts: 3,
            ..ShareCodePolicy::default()
        })
        .request_share_code(bob, bob_list)
        .unwrap_err();

    assert!(matches!(
        err,
        ShoplistError::FailedToProcess(RepoError::CodeConflict { attempts: 3 })
    ));
    assert_eq!(code_rows(&conn, bob_list), 0);
}

#[test]
fn expired_code_text_can_be_reused_by_another_list() {
    let conn = setup();
    let lists = list_service(&conn);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_list = lists.create_list(alice, "Alice").unwrap();
    let bob_list = lists.create_list(bob, "Bob").unwrap();
    scripted_service(&conn, &["REUSE1"])
        .request_share_code(alice, alice_list)
        .unwrap();
    conn.execute(
        "UPDATE invite_codes SET expires_at = 1 WHERE list_id = ?1;",
        [alice_list],
    )
    .unwrap();

    let bob_code = scripted_service(&conn, &["REUSE1"])
        .request_share_code(bob, bob_list)
        .unwrap();

    assert_eq!(bob_code.code, "REUSE1");
    assert_eq!(
        invite_service(&conn)
            .current_share_code(alice, alice_list)
            .unwrap(),
        None
    );
}

#[test]
fn revoked_code_stops_working_immediately() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();
    let invites = invite_service(&conn);
    let share = invites.request_share_code(owner, list_id).unwrap();

    invites.revoke_share_code(owner, list_id).unwrap();

    assert_eq!(invites.current_share_code(owner, list_id).unwrap(), None);
    assert!(matches!(
        invites.join(Uuid::new_v4(), &share.code),
        Err(ShoplistError::InvalidCode)
    ));
    let expires_at: i64 = conn
        .query_row(
            "SELECT expires_at FROM invite_codes WHERE list_id = ?1;",
            [list_id],
            |row| row.get(0),
        )
        .unwrap();
    assert!(expires_at <= now_epoch_ms());
}

#[test]
fn revoking_without_active_code_is_a_no_op() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();

    invite_service(&conn)
        .revoke_share_code(owner, list_id)
        .unwrap();
    assert_eq!(code_rows(&conn, list_id), 0);
}

#[test]
fn custom_ttl_is_applied() {
    let conn = setup();
    let owner = Uuid::new_v4();
    let list_id = list_service(&conn).create_list(owner, "Groceries").unwrap();

    let before = now_epoch_ms();
    let share = invite_service(&conn)
        .with_policy(ShareCodePolicy::with_ttl_hours(1))
        .request_share_code(owner, list_id)
        .unwrap();

    assert!(share.expires_at >= before + 60 * 60 * 1000);
    assert!(share.expires_at < before + DEFAULT_SHARE_CODE_TTL_MS);
}
