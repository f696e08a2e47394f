use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::engine::{self, FilterConfig, SortOrder};
use crate::fixtures;
use crate::model::{Collect, CollectPatch, User, Volunteer, VolunteerPatch, VolunteerSort};
use crate::session::{LoginMode, Session};
use crate::store::{Store, SyncError, SyncMode};

// Nothing listens on the discard port, so every request fails fast with a
// transport error. Good enough to exercise the fallback paths.
fn unreachable_api() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9", 1).unwrap()
}

fn restricted_session() -> Session {
    Session::with_user(User {
        username: "paul.v".to_string(),
        firstname: "Paul".to_string(),
        lastname: "Verne".to_string(),
        location: Some("Lille".to_string()),
        role: Some("volunteer".to_string()),
    })
}

fn admin_session() -> Session {
    Session::with_user(User {
        username: "admin".to_string(),
        firstname: "Admin".to_string(),
        lastname: "User".to_string(),
        location: Some("Paris".to_string()),
        role: None,
    })
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn empty_filter_yields_sorted_copy_of_full_mirror() {
    let volunteers = fixtures::demo_volunteers();
    let cfg = FilterConfig::<VolunteerSort>::default();
    let view = engine::derive_view(&volunteers, &cfg);

    // Default view: every record, newest registration first.
    let ids: Vec<i64> = view.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);

    // The mirror itself is never reordered.
    let mirror_ids: Vec<i64> = volunteers.iter().map(|v| v.id).collect();
    assert_eq!(mirror_ids, vec![1, 2, 3]);
}

#[test]
fn query_excludes_non_matching_records() {
    let volunteers = fixtures::demo_volunteers();
    let cfg = FilterConfig {
        query: "lyon".to_string(),
        ..FilterConfig::<VolunteerSort>::default()
    };
    let view = engine::derive_view(&volunteers, &cfg);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].location.as_deref(), Some("Lyon"));

    let cfg = FilterConfig {
        query: "no such volunteer".to_string(),
        ..FilterConfig::<VolunteerSort>::default()
    };
    assert!(engine::derive_view(&volunteers, &cfg).is_empty());
}

#[test]
fn query_matches_username_too() {
    let volunteers = fixtures::demo_volunteers();
    let cfg = FilterConfig {
        query: "sophie.b".to_string(),
        ..FilterConfig::<VolunteerSort>::default()
    };
    let view = engine::derive_view(&volunteers, &cfg);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 3);
}

#[test]
fn location_filter_is_exact_and_case_insensitive() {
    let volunteers = fixtures::demo_volunteers();
    let cfg = FilterConfig {
        location: "  PARIS ".to_string(),
        ..FilterConfig::<VolunteerSort>::default()
    };
    let view = engine::derive_view(&volunteers, &cfg);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 1);

    // "Par" is a substring, not an exact match.
    let cfg = FilterConfig {
        location: "Par".to_string(),
        ..FilterConfig::<VolunteerSort>::default()
    };
    assert!(engine::derive_view(&volunteers, &cfg).is_empty());
}

#[test]
fn date_range_is_inclusive_at_both_ends() {
    let mut volunteers = fixtures::demo_volunteers();
    // Registered at the very last millisecond of the upper bound day.
    volunteers.push(Volunteer {
        id: 4,
        firstname: "Nina".to_string(),
        lastname: "Petit".to_string(),
        username: "nina.p".to_string(),
        password: None,
        location: Some("Nantes".to_string()),
        points: 10,
        created_at: Some("2025-01-15T23:59:59.999".to_string()),
    });

    let cfg = FilterConfig {
        date_from: Some(date("2025-01-15")),
        date_to: Some(date("2025-01-15")),
        ..FilterConfig::<VolunteerSort>::default()
    };
    let view = engine::derive_view(&volunteers, &cfg);
    let mut ids: Vec<i64> = view.iter().map(|v| v.id).collect();
    ids.sort_unstable();
    // id 1 sits exactly on the lower bound (midnight), id 4 on the upper.
    assert_eq!(ids, vec![1, 4]);
}

#[test]
fn records_without_a_date_are_excluded_by_date_filters() {
    let mut volunteers = fixtures::demo_volunteers();
    volunteers[0].created_at = None;
    volunteers[1].created_at = Some("not a date".to_string());

    let cfg = FilterConfig {
        date_from: Some(date("2000-01-01")),
        ..FilterConfig::<VolunteerSort>::default()
    };
    let view = engine::derive_view(&volunteers, &cfg);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, 3);
}

#[test]
fn undated_records_sort_last_in_both_directions() {
    let mut volunteers = fixtures::demo_volunteers();
    volunteers.push(Volunteer {
        id: 4,
        firstname: "Nina".to_string(),
        lastname: "Petit".to_string(),
        username: "nina.p".to_string(),
        password: None,
        location: None,
        points: 0,
        created_at: None,
    });

    for order in [SortOrder::Asc, SortOrder::Desc] {
        let cfg = FilterConfig {
            order,
            ..FilterConfig::<VolunteerSort>::default()
        };
        let view = engine::derive_view(&volunteers, &cfg);
        assert_eq!(view.last().unwrap().id, 4);
    }
}

#[test]
fn points_sort_follows_direction() {
    let volunteers = vec![
        Volunteer {
            id: 1,
            firstname: "Marie".to_string(),
            lastname: "Dubois".to_string(),
            username: "marie.d".to_string(),
            password: None,
            location: Some("Paris".to_string()),
            points: 120,
            created_at: None,
        },
        Volunteer {
            id: 2,
            firstname: "Jean".to_string(),
            lastname: "Martin".to_string(),
            username: "jean.m".to_string(),
            password: None,
            location: Some("Lyon".to_string()),
            points: 98,
            created_at: None,
        },
    ];

    let cfg = FilterConfig {
        sort_by: VolunteerSort::Points,
        order: SortOrder::Desc,
        ..FilterConfig::default()
    };
    let ids: Vec<i64> = engine::derive_view(&volunteers, &cfg)
        .iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let cfg = FilterConfig {
        sort_by: VolunteerSort::Points,
        order: SortOrder::Asc,
        ..FilterConfig::default()
    };
    let ids: Vec<i64> = engine::derive_view(&volunteers, &cfg)
        .iter()
        .map(|v| v.id)
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn string_sort_ignores_case_and_accents() {
    use std::cmp::Ordering;
    assert_eq!(engine::compare_fr("école", "ECOLE"), Ordering::Equal);
    assert_eq!(engine::compare_fr("Évreux", "Lyon"), Ordering::Less);
    assert_eq!(engine::compare_fr("vêtements", "VETEMENTS"), Ordering::Equal);
}

#[test]
fn distinct_locations_are_trimmed_deduped_and_sorted() {
    let collects = vec![
        Collect {
            id: 1,
            item: "Vêtements".to_string(),
            quantity: 1,
            location: Some(" Paris ".to_string()),
            date: None,
        },
        Collect {
            id: 2,
            item: "Jouets".to_string(),
            quantity: 1,
            location: Some("Paris".to_string()),
            date: None,
        },
        Collect {
            id: 3,
            item: "Livres".to_string(),
            quantity: 1,
            location: Some("Évry".to_string()),
            date: None,
        },
        Collect {
            id: 4,
            item: "Nourriture".to_string(),
            quantity: 1,
            location: Some("   ".to_string()),
            date: None,
        },
        Collect {
            id: 5,
            item: "Meubles".to_string(),
            quantity: 1,
            location: None,
            date: None,
        },
    ];
    let options = engine::distinct_locations(&collects);
    assert_eq!(options, vec!["Évry".to_string(), "Paris".to_string()]);

    assert_eq!(
        engine::retain_selection(&options, "Paris"),
        Some("Paris".to_string())
    );
    assert_eq!(engine::retain_selection(&options, "Lyon"), None);
    assert_eq!(engine::retain_selection(&options, ""), None);
}

#[test]
fn wire_aliases_resolve_at_ingestion() {
    let collect: Collect = serde_json::from_str(
        r#"{"id":7,"type":"Livres","quantity":5,"place":"Nice","date":"2024-01-01"}"#,
    )
    .unwrap();
    assert_eq!(collect.item, "Livres");
    assert_eq!(collect.location.as_deref(), Some("Nice"));

    let volunteer: Volunteer = serde_json::from_str(
        r#"{"id":9,"firstname":"Ana","lastname":"Roy","username":"ana.r","date":"2025-02-01"}"#,
    )
    .unwrap();
    assert_eq!(volunteer.created_at.as_deref(), Some("2025-02-01"));
    assert_eq!(volunteer.points, 0);
}

#[test]
fn mirror_seed_deduplicates_by_id() {
    let mut first = fixtures::demo_volunteers()[0].clone();
    let mut second = first.clone();
    first.points = 1;
    second.points = 2;
    let store = Store::with_records(vec![first, second]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).unwrap().points, 2);
}

#[test]
fn adjusted_quantity_refuses_negative() {
    let collect = Collect {
        id: 1,
        item: "Jouets".to_string(),
        quantity: 0,
        location: None,
        date: None,
    };
    assert_eq!(collect.adjusted_quantity(-1), None);
    assert_eq!(collect.adjusted_quantity(1), Some(1));
}

#[tokio::test]
async fn create_fallback_synthesizes_max_plus_one() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::with_records(fixtures::demo_volunteers());

    let record = Volunteer {
        firstname: "Nina".to_string(),
        lastname: "Petit".to_string(),
        username: "nina.p".to_string(),
        ..Volunteer::default()
    };
    let (id, mode) = store.create(&api, &session, record.clone()).await.unwrap();
    assert_eq!(id, 4);
    assert_eq!(mode, SyncMode::Fallback);

    let (id, _) = store.create(&api, &session, record).await.unwrap();
    assert_eq!(id, 5);

    // Identifiers stay unique across the whole sequence.
    let mut ids: Vec<i64> = store.records().iter().map(|v| v.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.len());
}

#[tokio::test]
async fn create_fallback_on_empty_mirror_starts_at_one() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::<Volunteer>::new();

    let (id, _) = store
        .create(&api, &session, Volunteer::default())
        .await
        .unwrap();
    assert_eq!(id, 1);
}

#[tokio::test]
async fn restricted_role_cannot_mutate_volunteers() {
    let api = unreachable_api();
    let session = restricted_session();
    let mut store = Store::with_records(fixtures::demo_volunteers());
    let before: Vec<i64> = store.records().iter().map(|v| v.id).collect();

    let created = store.create(&api, &session, Volunteer::default()).await;
    assert!(matches!(created, Err(SyncError::Unauthorized)));

    let patch = VolunteerPatch {
        points: Some(0),
        ..VolunteerPatch::default()
    };
    let updated = store.update(&api, &session, 1, &patch).await;
    assert!(matches!(updated, Err(SyncError::Unauthorized)));

    let deleted = store.delete(&api, &session, 1).await;
    assert!(matches!(deleted, Err(SyncError::Unauthorized)));

    let after: Vec<i64> = store.records().iter().map(|v| v.id).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn collects_have_no_role_guard() {
    let api = unreachable_api();
    let session = restricted_session();
    let mut store = Store::with_records(fixtures::demo_collects());

    // The guard only covers volunteers; a restricted user may still touch
    // collects, here landing on the fallback path.
    let (id, mode) = store
        .create(&api, &session, Collect::default())
        .await
        .unwrap();
    assert_eq!(id, 4);
    assert_eq!(mode, SyncMode::Fallback);
}

#[tokio::test]
async fn delete_removes_locally_even_when_remote_fails() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::with_records(fixtures::demo_collects());

    let mode = store.delete(&api, &session, 2).await.unwrap();
    assert_eq!(mode, SyncMode::Fallback);
    assert!(store.get(2).is_none());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn update_surfaces_remote_failure_without_local_merge() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::with_records(fixtures::demo_volunteers());

    let patch = VolunteerPatch {
        points: Some(999),
        ..VolunteerPatch::default()
    };
    let result = store.update(&api, &session, 1, &patch).await;
    assert!(matches!(result, Err(SyncError::Remote(_))));
    // No silent local drift: the mirror still holds the old value.
    assert_eq!(store.get(1).unwrap().points, 120);
}

#[tokio::test]
async fn update_reports_not_found_for_unknown_id() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::with_records(fixtures::demo_collects());

    let patch = CollectPatch {
        quantity: Some(1),
        ..CollectPatch::default()
    };
    let result = store.update(&api, &session, 42, &patch).await;
    assert!(matches!(result, Err(SyncError::NotFound { id: 42 })));
}

#[tokio::test]
async fn load_failure_leaves_mirror_intact_until_demo_substitution() {
    let api = unreachable_api();
    let session = admin_session();
    let mut store = Store::with_records(vec![fixtures::demo_collects()[0].clone()]);

    assert!(store.load(&api, &session).await.is_err());
    assert_eq!(store.len(), 1);

    store.load_demo(fixtures::demo_collects());
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn login_falls_back_to_demo_allow_list() {
    let api = unreachable_api();
    let mut session = Session::new();

    let mode = session
        .login(&api, "admin", "admin123", &fixtures::demo_users())
        .await
        .unwrap();
    assert_eq!(mode, LoginMode::Demo);
    assert!(session.is_authenticated());
    assert!(session.token().unwrap().starts_with("demo-token-"));
    assert_eq!(session.user().unwrap().username, "admin");
    assert!(!session.is_restricted());
}

#[tokio::test]
async fn login_rejects_unknown_credentials_without_touching_state() {
    let api = unreachable_api();
    let mut session = Session::new();

    let result = session
        .login(&api, "admin", "wrong", &fixtures::demo_users())
        .await;
    assert!(result.is_err());
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[test]
fn logout_clears_the_session() {
    let mut session = admin_session();
    assert!(session.is_authenticated());
    session.reset();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[test]
fn wire_date_parsing_accepts_common_shapes() {
    assert!(crate::utils::parse_wire_date("2025-01-15").is_some());
    assert!(crate::utils::parse_wire_date("2025-01-15T23:59:59.999").is_some());
    assert!(crate::utils::parse_wire_date("2025-01-15T10:00:00Z").is_some());
    assert!(crate::utils::parse_wire_date("2025-01-15 10:00:00").is_some());
    assert!(crate::utils::parse_wire_date("").is_none());
    assert!(crate::utils::parse_wire_date("soon").is_none());
}

#[test]
fn cli_date_parsing_rejects_garbage() {
    assert!(crate::utils::parse_date_input("2025-01-15").is_ok());
    assert!(crate::utils::parse_date_input("15/01/2025").is_err());
    assert!(crate::utils::parse_date_input("").is_err());
}
