use rusqlite::Connection;
use shoplist_core::db::open_db_in_memory;
use shoplist_core::{
    InviteService, ListService, ShoplistError, SqliteInviteRepository, SqliteListRepository,
};
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn services(
    conn: &Connection,
) -> (
    ListService<SqliteListRepository<'_>>,
    InviteService<SqliteListRepository<'_>, SqliteInviteRepository<'_>>,
) {
    (
        ListService::new(SqliteListRepository::try_new(conn).unwrap()),
        InviteService::new(
            SqliteListRepository::try_new(conn).unwrap(),
            SqliteInviteRepository::try_new(conn).unwrap(),
        ),
    )
}

fn membership_rows(conn: &Connection, list_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM memberships WHERE list_id = ?1;",
        [list_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn valid_code_adds_exactly_one_membership() {
    let conn = setup();
    let (lists, invites) = services(&conn);
    let owner = Uuid::new_v4();
    let guest = Uuid::new_v4();
    let list_id = lists.create_list(owner, "Picnic").unwrap();
    let share = invites.request_share_code(owner, list_id).unwrap();

    assert_eq!(invites.join(guest, &share.code).unwrap(), list_id);

    assert_eq!(membership_rows(&conn, list_id), 2);
    let roster = lists.show_list(guest, list_id).unwrap();
    assert_eq!(roster.owner_id, owner);
    assert!(roster.contains(guest));
}

#[test]
fn code_is_not_consumed_by_redemption() {
    let conn = setup();
    let (lists, invites) = services(&conn);
    let owner = Uuid::new_v4();
    let list_id = lists.create_list(owner, "Picnic").unwrap();
    let share = invites.request_share_code(owner, list_id).unwrap();

    invites.join(Uuid::new_v4(), &share.code).unwrap();
    invites.join(Uuid::new_v4(), &share.code).unwrap();

    assert_eq!(membership_rows(&conn, list_id), 3);
    assert_eq!(
        invites.current_share_code(owner, list_id).unwrap(),
        Some(share)
    );
}

#[test]
fn existing_member_gets_already_member_without_duplicate() {
    let conn = setup();
    let (lists, invites) = services(&conn);
    let owner = Uuid::new_v4();
    let list_id = lists.create_list(owner, "Picnic").unwrap();
    let share = invites.request_share_code(owner, list_id).unwrap();

    let err = invites.join(owner, &share.code).unwrap_err();
    assert!(matches!(err, ShoplistError::AlreadyMember(id) if id == list_id));
    assert_eq!(err.code(), "already_member");
    assert_eq!(membership_rows(&conn, list_id), 1);
}

#[test]
fn expired_code_is_invalid() {
    let conn = setup();
    let (lists, invites) = services(&conn);
    let owner = Uuid::new_v4();
    let list_id = lists.create_list(owner, "Picnic").unwrap();
    let share = invites.request_share_code(owner, list_id).unwrap();
    conn.execute(
        "UPDATE invite_codes SET expires_at = 0 WHERE list_id = ?1;",
        [list_id],
    )
    .unwrap();

    let err = invites.join(Uuid::new_v4(), &share.code).unwrap_err();
    assert!(matches!(err, ShoplistError::InvalidCode));
    assert_eq!(membership_rows(&conn, list_id), 1);
}

#[test]
fn unknown_and_malformed_codes_are_invalid() {
    let conn = setup();
    let (_, invites) = services(&conn);

    for code in ["NOPE42", "", "abc123", "TOOLONG1", "AB 12C"] {
        let err = invites.join(Uuid::new_v4(), code).unwrap_err();
        assert!(
            matches!(err, ShoplistError::InvalidCode),
            "code `{code}` gave {err}"
        );
    }
}
