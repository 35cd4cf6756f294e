use chrono::{DateTime, Duration, TimeZone, Utc};
use dealerpilot::db::*;
use dealerpilot::error::CrmError;
use dealerpilot::model::*;
use dealerpilot::ops::board_ops::{self, Direction};
use dealerpilot::ops::lead_ops::{self, QuickAdd};
use dealerpilot::ops::user_ops;
use dealerpilot::store::{MemoryDocuments, PoolStore};

fn setup() -> rusqlite::Connection {
    let conn = schema::test_connection();
    user_ops::seed_defaults(&conn).unwrap();
    conn
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn u(id: &str) -> Id<User> {
    Id::new(id)
}

fn p(id: &str) -> Id<Pool> {
    Id::new(id)
}

fn add_jordan(conn: &rusqlite::Connection) -> Lead {
    let input = QuickAdd {
        name: Some("Jordan Avery"),
        phone: Some("555 201 9933"),
        source: Some("Website"),
        ..QuickAdd::default()
    };
    lead_ops::quick_add(conn, &u("u4"), &input, now()).unwrap()
}

// ==========================================================================
// QUICK ADD
// ==========================================================================

#[test]
fn quick_add_assigns_to_owner_with_first_call() {
    let conn = setup();
    let lead = add_jordan(&conn);

    assert_eq!(lead.assigned_to, Some(u("u4")));
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.phone.as_deref(), Some("(555)-201-9933"));
    let action = lead.next_action.clone().unwrap();
    assert_eq!(action.kind, ActionType::Call);
    assert_eq!(action.due_at, now() + Duration::hours(2));

    let stored = lead_repo::find_by_id(&conn, &lead.id).unwrap().unwrap();
    assert_eq!(stored, lead);
}

#[test]
fn quick_add_requires_some_contact() {
    let conn = setup();
    let input = QuickAdd {
        name: Some("   "),
        source: Some("Walk-in"),
        ..QuickAdd::default()
    };
    let result = lead_ops::quick_add(&conn, &u("u4"), &input, now());
    assert!(matches!(result, Err(CrmError::MissingContact)));
    assert!(lead_repo::find_all(&conn).unwrap().is_empty());
}

#[test]
fn quick_add_fills_name_and_source_defaults() {
    let conn = setup();
    let input = QuickAdd {
        email: Some("buyer@example.com"),
        ..QuickAdd::default()
    };
    let lead = lead_ops::quick_add(&conn, &u("u1"), &input, now()).unwrap();
    assert_eq!(lead.name, "Unnamed");
    assert_eq!(lead.source, "Manual");
}

#[test]
fn quick_add_with_appointment_books_it() {
    let conn = setup();
    let at = now() + Duration::days(1);
    let input = QuickAdd {
        name: Some("Sam Patel"),
        note: Some("Wants a test drive"),
        appointment: Some((at, None)),
        ..QuickAdd::default()
    };
    let lead = lead_ops::quick_add(&conn, &u("u6"), &input, now()).unwrap();
    assert_eq!(lead.status, LeadStatus::ApptSet);
    assert_eq!(lead.next_action.as_ref().unwrap().kind, ActionType::Appt);

    let appt = appointment_repo::find_live_for_lead(&conn, &lead.id).unwrap().unwrap();
    assert_eq!(appt.at, at);
    assert_eq!(appt.duration_min, 30);
    assert_eq!(appt.assigned_to, Some(u("u6")));
    assert_eq!(appt.notes, "Wants a test drive");

    let timeline = activity_repo::find_by_lead(&conn, &lead.id).unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].kind, ActivityKind::Note);
}

#[test]
fn quick_add_never_touches_rotation() {
    let conn = setup();
    let store = PoolStore::new(&conn);
    store.save_pools(&Pool::defaults()).unwrap();
    add_jordan(&conn);
    assert_eq!(store.get_next_index(&p("pool_sales")), 0);
    assert_eq!(store.get_next_index(&p("pool_bdc")), 0);
}

#[test]
fn quick_add_failure_leaves_no_partial_lead() {
    let conn = setup();
    conn.execute_batch("DROP TABLE appointments").unwrap();
    let input = QuickAdd {
        name: Some("Riley Stone"),
        phone: Some("5550001111"),
        note: Some("Wants a test drive"),
        appointment: Some((now() + Duration::days(1), None)),
        ..QuickAdd::default()
    };

    assert!(lead_ops::quick_add(&conn, &u("u4"), &input, now()).is_err());
    assert!(lead_repo::find_all(&conn).unwrap().is_empty());
}

#[test]
fn quick_add_rejects_appointment_past_calendar() {
    let conn = setup();
    let input = QuickAdd {
        name: Some("Riley Stone"),
        phone: Some("5550001111"),
        appointment: Some((now(), Some(9_999_999_999_999))),
        ..QuickAdd::default()
    };

    let result = lead_ops::quick_add(&conn, &u("u4"), &input, now());
    assert!(matches!(result, Err(CrmError::OutOfRange { .. })));
    assert!(lead_repo::find_all(&conn).unwrap().is_empty());
}

// ==========================================================================
// ASSIGN / STATUS
// ==========================================================================

#[test]
fn assign_lead_is_a_plain_field_write() {
    let conn = setup();
    let store = PoolStore::new(&conn);
    store.save_pools(&Pool::defaults()).unwrap();
    let lead = add_jordan(&conn);

    let later = now() + Duration::minutes(10);
    let updated = lead_ops::assign_lead(&conn, &lead.id, &u("u6"), later).unwrap().unwrap();
    assert_eq!(updated.assigned_to, Some(u("u6")));
    assert_eq!(updated.last_activity_at, later);
    assert_eq!(store.get_next_index(&p("pool_sales")), 0);
}

#[test]
fn assign_unknown_lead_returns_none() {
    let conn = setup();
    let result = lead_ops::assign_lead(&conn, &Id::new("ghost"), &u("u6"), now()).unwrap();
    assert!(result.is_none());
}

#[test]
fn set_status_unknown_lead_is_not_found() {
    let conn = setup();
    let result = lead_ops::set_status(&conn, &Id::new("ghost"), LeadStatus::Sold, now());
    assert!(matches!(result, Err(CrmError::NotFound { .. })));
}

// ==========================================================================
// APPOINTMENTS
// ==========================================================================

#[test]
fn schedule_then_reschedule_keeps_one_appointment() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let first = now() + Duration::days(1);
    let second = first + Duration::hours(3);

    let (lead_after, appt) =
        lead_ops::schedule_appointment(&conn, &lead.id, first, None, &u("m1"), now()).unwrap();
    assert_eq!(lead_after.status, LeadStatus::ApptSet);
    assert_eq!(appt.assigned_to, Some(u("u4")));

    let (_, moved) =
        lead_ops::schedule_appointment(&conn, &lead.id, second, Some(60), &u("m1"), now()).unwrap();
    assert_eq!(moved.id, appt.id);
    assert_eq!(moved.at, second);
    assert_eq!(moved.duration_min, 60);
    assert_eq!(appointment_repo::find_by_lead(&conn, &lead.id).unwrap().len(), 1);
}

#[test]
fn schedule_for_unassigned_lead_goes_to_actor() {
    let conn = setup();
    let lead = Lead::create("Walk-in".into(), "Walk-in".into(), now());
    lead_repo::insert(&conn, &lead).unwrap();

    let (_, appt) =
        lead_ops::schedule_appointment(&conn, &lead.id, now(), None, &u("m1"), now()).unwrap();
    assert_eq!(appt.assigned_to, Some(u("m1")));
}

#[test]
fn schedule_rejects_non_positive_duration() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let result = lead_ops::schedule_appointment(&conn, &lead.id, now(), Some(0), &u("m1"), now());
    assert!(matches!(result, Err(CrmError::NonPositive { .. })));
}

#[test]
fn cancel_returns_lead_to_working() {
    let conn = setup();
    let lead = add_jordan(&conn);
    lead_ops::schedule_appointment(&conn, &lead.id, now(), None, &u("m1"), now()).unwrap();

    let cancelled = lead_ops::cancel_appointment(&conn, &lead.id, now()).unwrap();
    assert_eq!(cancelled.status, LeadStatus::Working);
    assert!(cancelled.next_action.is_none());
    assert!(appointment_repo::find_live_for_lead(&conn, &lead.id).unwrap().is_none());
}

#[test]
fn cancel_without_appointment_changes_nothing() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let same = lead_ops::cancel_appointment(&conn, &lead.id, now()).unwrap();
    assert_eq!(same, lead);
}

#[test]
fn schedule_rejects_duration_past_calendar() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let result = lead_ops::schedule_appointment(
        &conn,
        &lead.id,
        now(),
        Some(9_999_999_999_999),
        &u("m1"),
        now(),
    );
    assert!(matches!(result, Err(CrmError::OutOfRange { .. })));
    assert!(appointment_repo::find_by_lead(&conn, &lead.id).unwrap().is_empty());
    assert_eq!(lead_repo::find_by_id(&conn, &lead.id).unwrap().unwrap(), lead);
}

#[test]
fn appointment_outcome_is_recorded() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let (_, appt) =
        lead_ops::schedule_appointment(&conn, &lead.id, now(), None, &u("m1"), now()).unwrap();

    let showed = lead_ops::set_appointment_status(&conn, &appt.id, AppointmentStatus::Showed)
        .unwrap()
        .unwrap();
    assert_eq!(showed.status, AppointmentStatus::Showed);

    lead_ops::set_appointment_status(&conn, &appt.id, AppointmentStatus::NoShow).unwrap();
    let stored = appointment_repo::find_by_id(&conn, &appt.id).unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::NoShow);
    // The pipeline status is not derived from the outcome.
    let lead_after = lead_repo::find_by_id(&conn, &lead.id).unwrap().unwrap();
    assert_eq!(lead_after.status, LeadStatus::ApptSet);
}

#[test]
fn shift_moves_appointment_and_pending_action() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let at = now() + Duration::days(1);
    let (_, appt) =
        lead_ops::schedule_appointment(&conn, &lead.id, at, None, &u("m1"), now()).unwrap();

    let moved = lead_ops::shift_appointment(&conn, &appt.id, 60, now()).unwrap().unwrap();
    assert_eq!(moved.at, at + Duration::hours(1));
    assert_eq!(appointment_repo::find_by_id(&conn, &appt.id).unwrap().unwrap().at, moved.at);

    let lead_after = lead_repo::find_by_id(&conn, &lead.id).unwrap().unwrap();
    let action = lead_after.next_action.unwrap();
    assert_eq!(action.kind, ActionType::Appt);
    assert_eq!(action.due_at, moved.at);

    let earlier = lead_ops::shift_appointment(&conn, &appt.id, -90, now()).unwrap().unwrap();
    assert_eq!(earlier.at, at - Duration::minutes(30));
}

#[test]
fn appointment_edits_on_unknown_id_return_none() {
    let conn = setup();
    let missing: Id<Appointment> = Id::new("nope");
    assert!(lead_ops::set_appointment_status(&conn, &missing, AppointmentStatus::Showed)
        .unwrap()
        .is_none());
    assert!(lead_ops::shift_appointment(&conn, &missing, 60, now()).unwrap().is_none());
}

#[test]
fn shift_past_calendar_leaves_appointment_alone() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let (_, appt) =
        lead_ops::schedule_appointment(&conn, &lead.id, now(), None, &u("m1"), now()).unwrap();

    let result = lead_ops::shift_appointment(&conn, &appt.id, 9_999_999_999_999, now());
    assert!(matches!(result, Err(CrmError::OutOfRange { .. })));
    assert_eq!(appointment_repo::find_by_id(&conn, &appt.id).unwrap().unwrap().at, now());
}

// ==========================================================================
// FOLLOW-UPS
// ==========================================================================

#[test]
fn snooze_pushes_back_from_due_time() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let due = lead.next_action.as_ref().unwrap().due_at;

    let snoozed = lead_ops::snooze_lead(&conn, &lead.id, 30, now()).unwrap();
    let action = snoozed.next_action.unwrap();
    assert_eq!(action.kind, ActionType::Call);
    assert_eq!(action.due_at, due + Duration::minutes(30));
    assert_eq!(activity_repo::find_by_lead(&conn, &lead.id).unwrap()[0].kind, ActivityKind::Snooze);
}

#[test]
fn snooze_overdue_action_counts_from_now() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let late = now() + Duration::hours(5);
    let snoozed = lead_ops::snooze_lead(&conn, &lead.id, 15, late).unwrap();
    assert_eq!(snoozed.next_action.unwrap().due_at, late + Duration::minutes(15));
}

#[test]
fn snooze_rejects_zero_minutes() {
    let conn = setup();
    let lead = add_jordan(&conn);
    assert!(lead_ops::snooze_lead(&conn, &lead.id, 0, now()).is_err());
}

#[test]
fn snooze_past_calendar_is_rejected() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let result = lead_ops::snooze_lead(&conn, &lead.id, 9_999_999_999_999, now());
    assert!(matches!(result, Err(CrmError::OutOfRange { .. })));

    assert_eq!(lead_repo::find_by_id(&conn, &lead.id).unwrap().unwrap(), lead);
    assert!(activity_repo::find_by_lead(&conn, &lead.id)
        .unwrap()
        .iter()
        .all(|a| a.kind != ActivityKind::Snooze));
}

#[test]
fn mark_done_moves_new_lead_to_working() {
    let conn = setup();
    let lead = add_jordan(&conn);
    let done = lead_ops::mark_done(&conn, &lead.id, now()).unwrap();
    assert_eq!(done.status, LeadStatus::Working);
    assert!(done.next_action.is_none());
    assert_eq!(activity_repo::find_by_lead(&conn, &lead.id).unwrap()[0].kind, ActivityKind::Done);
}

#[test]
fn delete_lead_removes_it() {
    let conn = setup();
    let lead = add_jordan(&conn);
    lead_ops::delete_lead(&conn, &lead.id).unwrap();
    assert!(lead_repo::find_by_id(&conn, &lead.id).unwrap().is_none());
    assert!(lead_ops::delete_lead(&conn, &lead.id).is_err());
}

// ==========================================================================
// USERS
// ==========================================================================

#[test]
fn seed_defaults_runs_once() {
    let conn = setup();
    assert_eq!(user_ops::seed_defaults(&conn).unwrap(), 0);
    assert_eq!(user_repo::count(&conn).unwrap(), 5);
}

#[test]
fn add_user_rejects_duplicate_email() {
    let conn = setup();
    let user = user_ops::add_user(&conn, "Rita S.", "rita@example.com", Role::Bdc, None).unwrap();
    assert_eq!(user.dept, "Sales");

    let again = user_ops::add_user(&conn, "Rita Two", "RITA@example.com", Role::Sales, None);
    assert!(matches!(again, Err(CrmError::AlreadyExists { .. })));
}

#[test]
fn add_user_rejects_blank_name() {
    let conn = setup();
    let result = user_ops::add_user(&conn, "  ", "x@example.com", Role::Sales, None);
    assert!(matches!(result, Err(CrmError::BlankField { .. })));
}

#[test]
fn role_and_active_changes_persist() {
    let conn = setup();
    user_ops::set_role(&conn, &u("u4"), Role::Manager).unwrap();
    user_ops::set_active(&conn, &u("u4"), false).unwrap();
    let jimmy = user_repo::find_by_id(&conn, &u("u4")).unwrap().unwrap();
    assert_eq!(jimmy.role, Role::Manager);
    assert!(!jimmy.active);

    user_ops::remove_user(&conn, &u("u4")).unwrap();
    assert!(matches!(user_ops::remove_user(&conn, &u("u4")), Err(CrmError::NotFound { .. })));
}

// ==========================================================================
// BOARD EDITS THROUGH THE STORE
// ==========================================================================

#[test]
fn move_then_save_keeps_seat_count() {
    let store = PoolStore::new(MemoryDocuments::new());
    let pools = store.load_pools();
    let before: usize = pools.iter().map(|p| p.users.len()).sum();

    let next = board_ops::move_member(&pools, Access::Edit, &p("pool_bdc"), &u("u1"), &p("pool_sales"), Some(0));
    assert_ne!(next, pools);
    store.save_pools(&next).unwrap();

    let reloaded = store.load_pools();
    assert_eq!(reloaded.iter().map(|p| p.users.len()).sum::<usize>(), before);
    assert_eq!(store.get_next_user(&p("pool_sales")).unwrap().id.as_str(), "u1");
    assert!(store.get_pool(&p("pool_bdc")).unwrap().find_member(&u("u1")).is_none());
}

#[test]
fn reorder_changes_who_is_next() {
    let store = PoolStore::new(MemoryDocuments::new());
    let pools = store.load_pools();
    let next = board_ops::swap_adjacent(&pools, Access::Edit, &p("pool_sales"), &u("u5"), Direction::Up);
    store.save_pools(&next).unwrap();
    assert_eq!(store.get_next_user(&p("pool_sales")).unwrap().id.as_str(), "u5");
}

#[test]
fn view_only_edits_leave_board_unchanged() {
    let pools = Pool::defaults();
    let access = Access::for_role(Role::Sales);
    let moved = board_ops::move_member(&pools, access, &p("pool_bdc"), &u("u1"), &p("pool_sales"), None);
    assert_eq!(moved, pools);
}
