use chrono::{TimeZone, Utc};
use dealerpilot::model::*;

// ==========================================================================
// POOL / MEMBER
// ==========================================================================

#[test]
fn member_defaults_to_active() {
    let m = Member::new("u1", "Tony W.");
    assert!(m.active);
    assert!(!m.inactive().active);
}

#[test]
fn pool_defaults_to_pointer_zero_and_no_members() {
    let pool = Pool::new("pool_x", "Used Cars");
    assert_eq!(pool.next_index, 0);
    assert!(pool.users.is_empty());
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn seed_pools_match_demo_board() {
    let pools = Pool::defaults();
    let names: Vec<&str> = pools.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Internet BDC", "Floor Sales", "Service BDC"]);
    assert_eq!(pools.iter().map(|p| p.users.len()).sum::<usize>(), 8);
    assert!(pools.iter().all(|p| p.next_index == 0));
    assert!(pools.iter().flat_map(|p| &p.users).all(|m| m.active));
}

#[test]
fn pool_member_lookup() {
    let pool = Pool::defaults().remove(1);
    assert_eq!(pool.position_of(&Id::new("u5")), Some(1));
    assert_eq!(pool.find_member(&Id::new("u6")).unwrap().name, "Tony W.");
    assert!(pool.find_member(&Id::new("u1")).is_none());
}

#[test]
fn pool_deserializes_from_document_shape() {
    let json = r#"{"id":"pool_bdc","name":"Internet BDC","nextIndex":2,
        "users":[{"id":"u1","name":"Tony W.","active":false}]}"#;
    let pool: Pool = serde_json::from_str(json).unwrap();
    assert_eq!(pool.next_index, 2);
    assert!(!pool.users[0].active);
}

// ==========================================================================
// ROLES
// ==========================================================================

#[test]
fn role_parse_accepts_known_roles() {
    assert_eq!(Role::parse("manager").unwrap(), Role::Manager);
    assert_eq!(Role::parse(" BDC ").unwrap(), Role::Bdc);
    assert!(Role::parse("rep").is_err());
}

#[test]
fn unknown_stored_role_falls_back_to_sales() {
    assert_eq!(Role::from_db_str("owner"), Role::Sales);
}

#[test]
fn only_manager_bdc_admin_edit_rotation() {
    let editors: Vec<Role> = Role::ALL
        .iter()
        .copied()
        .filter(|r| r.can_edit_rotation())
        .collect();
    assert_eq!(editors, vec![Role::Bdc, Role::Manager, Role::Admin]);
    assert_eq!(Access::for_role(Role::Viewer), Access::ViewOnly);
    assert_eq!(Access::for_role(Role::Admin), Access::Edit);
}

#[test]
fn demo_team_has_one_manager() {
    let users = User::defaults();
    assert_eq!(users.iter().filter(|u| u.role == Role::Manager).count(), 1);
    assert!(users.iter().all(|u| u.active));
}

// ==========================================================================
// LEADS
// ==========================================================================

#[test]
fn lead_status_db_strings() {
    for status in LeadStatus::ALL {
        assert_eq!(LeadStatus::from_db_str(status.to_db_str()), Some(*status));
    }
    assert_eq!(LeadStatus::parse("APPT_SET").unwrap(), LeadStatus::ApptSet);
    assert!(LeadStatus::parse("closed").is_err());
}

#[test]
fn lead_patch_only_touches_given_fields() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut lead = Lead::create("Jordan Avery".into(), "Website".into(), now);
    lead.next_action = Some(NextAction::new(ActionType::Call, now));

    let patch = LeadPatch {
        assigned_to: Some(Id::new("u4")),
        ..LeadPatch::default()
    };
    patch.apply(&mut lead);
    assert_eq!(lead.assigned_to, Some(Id::new("u4")));
    assert_eq!(lead.status, LeadStatus::New);
    assert!(lead.next_action.is_some());

    let clear = LeadPatch {
        next_action: Some(None),
        ..LeadPatch::default()
    };
    clear.apply(&mut lead);
    assert!(lead.next_action.is_none());
    assert_eq!(lead.assigned_to, Some(Id::new("u4")));
}

#[test]
fn lead_is_overdue_only_when_action_past_due() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut lead = Lead::create("Sam Patel".into(), "Facebook".into(), now);
    assert!(!lead.is_overdue(now));
    lead.next_action = Some(NextAction::new(ActionType::Sms, now - chrono::Duration::hours(1)));
    assert!(lead.is_overdue(now));
}

#[test]
fn appointment_inherits_lead_owner() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut lead = Lead::create("Maya Chen".into(), "Phone".into(), now);
    lead.assigned_to = Some(Id::new("u6"));
    let appt = Appointment::schedule(&lead, now, 45);
    assert_eq!(appt.assigned_to, Some(Id::new("u6")));
    assert_eq!(appt.status, AppointmentStatus::Scheduled);
    assert_eq!(appt.ends_at(), Some(now + chrono::Duration::minutes(45)));
}

#[test]
fn appointment_end_past_calendar_is_none() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let lead = Lead::create("Maya Chen".into(), "Phone".into(), now);
    let appt = Appointment::schedule(&lead, now, 9_999_999_999_999);
    assert!(appt.ends_at().is_none());
}

#[test]
fn appointment_status_parse() {
    assert_eq!(AppointmentStatus::parse("no-show").unwrap(), AppointmentStatus::NoShow);
    assert_eq!(AppointmentStatus::parse(" Showed ").unwrap(), AppointmentStatus::Showed);
    assert!(AppointmentStatus::parse("late").is_err());
}
