//! Approval readiness checks for a booking.
//!
//! Three independent checks feed the approval checklist:
//! - space conflicts: the booking holds no space that another live booking holds at the same time
//! - room allocation: allocated rooms cover the requested rooms in every category
//! - catering assignment: every meal job has a caterer
//!
//! All functions here are pure over already loaded rows. Loading the rows and
//! deciding what a failing checklist means for approval is the caller's job
//! (see [`super::booking_approval`]).

use std::borrow::Borrow;

use db::models::{
    booking::{AccommodationRequests, Booking, RoomCategory},
    meal_job::MealJob,
    room::RoomWithAssignment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

/// Room type names that carry a double-sized bed. Matched as case-sensitive substrings.
const DOUBLE_BED_TYPES: [&str; 3] = ["Double", "Queen", "King"];

/// Options that are both selected on the allocation and supported by the room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub extra_bed: bool,
    pub ensuite: bool,
    pub private_study: bool,
}

impl EffectiveOptions {
    pub fn for_room(room: &RoomWithAssignment) -> Self {
        let selection = room.selection.unwrap_or_default();
        Self {
            extra_bed: selection.extra_bed_selected.unwrap_or(false) && room.extra_bed_allowed,
            ensuite: selection.ensuite_selected.unwrap_or(false) && room.ensuite_available,
            private_study: selection.private_study_selected.unwrap_or(false)
                && room.private_study_available,
        }
    }
}

/// Category a room counts towards, and how many units it contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomClassification {
    pub category: RoomCategory,
    pub units: u32,
}

struct ClassificationRule {
    category: RoomCategory,
    units: fn(&str, EffectiveOptions) -> Option<u32>,
}

/// Evaluated top to bottom; the first rule that yields units decides the category.
const CLASSIFICATION_RULES: [ClassificationRule; 4] = [
    ClassificationRule {
        category: RoomCategory::StudySuite,
        units: study_suite_units,
    },
    ClassificationRule {
        category: RoomCategory::DoubleEnsuite,
        units: double_ensuite_units,
    },
    ClassificationRule {
        category: RoomCategory::DoubleBb,
        units: double_bb_units,
    },
    ClassificationRule {
        category: RoomCategory::SingleBb,
        units: single_bb_units,
    },
];

fn has_double_bed(room_type_name: &str) -> bool {
    DOUBLE_BED_TYPES
        .iter()
        .any(|bed| room_type_name.contains(bed))
}

fn study_suite_units(room_type_name: &str, options: EffectiveOptions) -> Option<u32> {
    (has_double_bed(room_type_name) && options.ensuite && options.private_study).then_some(1)
}

// Any bed type: a Twin Single with an ensuite also lands here.
fn double_ensuite_units(_room_type_name: &str, options: EffectiveOptions) -> Option<u32> {
    (options.ensuite && !options.private_study).then_some(1)
}

fn double_bb_units(room_type_name: &str, _options: EffectiveOptions) -> Option<u32> {
    has_double_bed(room_type_name).then_some(1)
}

// A Twin Single with an extra bed counts 3 units from one room.
fn single_bb_units(room_type_name: &str, options: EffectiveOptions) -> Option<u32> {
    match room_type_name {
        "Single" => Some(1),
        "Twin Single" if options.extra_bed => Some(3),
        "Twin Single" => Some(2),
        _ => None,
    }
}

/// Classify a room by its type name and effective options. `None` means the
/// room counts towards no category.
pub fn classify_room(room: &RoomWithAssignment) -> Option<RoomClassification> {
    let options = EffectiveOptions::for_room(room);
    CLASSIFICATION_RULES.iter().find_map(|rule| {
        (rule.units)(&room.room_type_name, options).map(|units| RoomClassification {
            category: rule.category,
            units,
        })
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct CategoryCount {
    pub requested: u32,
    pub allocated: u32,
}

impl CategoryCount {
    pub fn is_met(&self) -> bool {
        self.allocated >= self.requested
    }
}

/// Requested against allocated, per room category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct CategoryBreakdown {
    #[serde(rename = "doubleBB")]
    pub double_bb: CategoryCount,
    #[serde(rename = "singleBB")]
    pub single_bb: CategoryCount,
    #[serde(rename = "studySuite")]
    pub study_suite: CategoryCount,
    #[serde(rename = "doubleEnsuite")]
    pub double_ensuite: CategoryCount,
}

impl CategoryBreakdown {
    pub fn get(&self, category: RoomCategory) -> CategoryCount {
        match category {
            RoomCategory::DoubleBb => self.double_bb,
            RoomCategory::SingleBb => self.single_bb,
            RoomCategory::StudySuite => self.study_suite,
            RoomCategory::DoubleEnsuite => self.double_ensuite,
        }
    }

    fn get_mut(&mut self, category: RoomCategory) -> &mut CategoryCount {
        match category {
            RoomCategory::DoubleBb => &mut self.double_bb,
            RoomCategory::SingleBb => &mut self.single_bb,
            RoomCategory::StudySuite => &mut self.study_suite,
            RoomCategory::DoubleEnsuite => &mut self.double_ensuite,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct RoomAllocationCheck {
    pub passed: bool,
    pub categories: CategoryBreakdown,
    pub total_requested: u32,
    pub total_allocated: u32,
}

impl RoomAllocationCheck {
    /// Day-use bookings need no accommodation
    pub fn not_required() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct CateringAssignmentCheck {
    pub total_meals: u32,
    pub assigned_meals: u32,
    pub unassigned_meals: u32,
    pub passed: bool,
}

impl CateringAssignmentCheck {
    /// Stand-in when the booking has no catering
    pub fn not_required() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SpaceConflictCheck {
    pub passed: bool,
    pub conflict_count: u32,
}

/// The full approval checklist. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct BookingValidationChecks {
    pub space_conflicts: SpaceConflictCheck,
    pub room_allocation: RoomAllocationCheck,
    pub catering_assignment: CateringAssignmentCheck,
}

impl BookingValidationChecks {
    pub fn all_passed(&self) -> bool {
        self.space_conflicts.passed && self.room_allocation.passed && self.catering_assignment.passed
    }

    /// Human readable reasons for every failing check
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();

        if !self.space_conflicts.passed {
            failures.push(format!(
                "{} space reservation conflict(s)",
                self.space_conflicts.conflict_count
            ));
        }

        if !self.room_allocation.passed {
            for category in RoomCategory::ALL {
                let count = self.room_allocation.categories.get(category);
                if !count.is_met() {
                    failures.push(format!(
                        "{}: {} / {} rooms allocated",
                        category, count.allocated, count.requested
                    ));
                }
            }
            if self.room_allocation.total_allocated < self.room_allocation.total_requested {
                failures.push(format!(
                    "total: {} / {} rooms allocated",
                    self.room_allocation.total_allocated, self.room_allocation.total_requested
                ));
            }
        }

        if !self.catering_assignment.passed {
            failures.push(format!(
                "{} of {} meal job(s) without a caterer",
                self.catering_assignment.unassigned_meals, self.catering_assignment.total_meals
            ));
        }

        failures
    }
}

/// Compare the rooms allocated to a booking with the rooms it requested.
///
/// Non-overnight bookings always pass with every count at zero. Otherwise each
/// room is classified with [`classify_room`] and the check passes when every
/// category, and the total, has at least as many units allocated as requested.
pub fn validate_room_allocation(
    is_overnight: bool,
    requests: &AccommodationRequests,
    rooms: &[RoomWithAssignment],
) -> RoomAllocationCheck {
    if !is_overnight {
        return RoomAllocationCheck::not_required();
    }

    let mut categories = CategoryBreakdown::default();
    for category in RoomCategory::ALL {
        categories.get_mut(category).requested = requests.get(category);
    }

    for room in rooms {
        match classify_room(room) {
            Some(classification) => {
                categories.get_mut(classification.category).allocated += classification.units;
            }
            None => {
                debug!(
                    room_id = %room.room_id,
                    room_type = %room.room_type_name,
                    "Room counts towards no accommodation category"
                );
            }
        }
    }

    let total_requested: u32 = RoomCategory::ALL
        .iter()
        .map(|c| categories.get(*c).requested)
        .sum();
    let total_allocated: u32 = RoomCategory::ALL
        .iter()
        .map(|c| categories.get(*c).allocated)
        .sum();
    let passed = RoomCategory::ALL
        .iter()
        .all(|c| categories.get(*c).is_met())
        && total_allocated >= total_requested;

    RoomAllocationCheck {
        passed,
        categories,
        total_requested,
        total_allocated,
    }
}

/// Every meal job must have a caterer. An empty list passes.
pub fn validate_catering_assignments<J: Borrow<MealJob>>(meal_jobs: &[J]) -> CateringAssignmentCheck {
    let total_meals = meal_jobs.len() as u32;
    let assigned_meals = meal_jobs
        .iter()
        .filter(|job| Borrow::<MealJob>::borrow(*job).is_assigned())
        .count() as u32;

    CateringAssignmentCheck {
        total_meals,
        assigned_meals,
        unassigned_meals: total_meals - assigned_meals,
        passed: assigned_meals == total_meals,
    }
}

pub fn validate_space_conflicts(conflict_count: u32) -> SpaceConflictCheck {
    SpaceConflictCheck {
        passed: conflict_count == 0,
        conflict_count,
    }
}

/// Build the approval checklist for a booking.
///
/// The meal job list is only looked at when the booking requires catering.
/// No overall verdict is taken here; see [`BookingValidationChecks::all_passed`].
pub fn validate_booking_for_approval<J: Borrow<MealJob>>(
    booking: &Booking,
    rooms: &[RoomWithAssignment],
    meal_jobs: &[J],
    space_conflict_count: u32,
) -> BookingValidationChecks {
    let room_allocation = validate_room_allocation(
        booking.is_overnight,
        &booking.accommodation_requests,
        rooms,
    );

    let catering_assignment = if booking.catering_required {
        validate_catering_assignments(meal_jobs)
    } else {
        CateringAssignmentCheck::not_required()
    };

    let checks = BookingValidationChecks {
        space_conflicts: validate_space_conflicts(space_conflict_count),
        room_allocation,
        catering_assignment,
    };

    debug!(
        booking_id = %booking.id,
        space_conflicts_passed = checks.space_conflicts.passed,
        room_allocation_passed = checks.room_allocation.passed,
        catering_assignment_passed = checks.catering_assignment.passed,
        "Computed approval checklist"
    );

    checks
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use db::models::{
        booking::BookingStatus,
        meal_job::{MealJobWithCaterer, MealType},
        room::AssignmentSelection,
    };
    use uuid::Uuid;

    use super::*;

    fn booking(
        is_overnight: bool,
        accommodation_requests: AccommodationRequests,
        catering_required: bool,
    ) -> Booking {
        let date = NaiveDate::from_ymd_opt(2026, 7, 3).unwrap();
        Booking {
            id: Uuid::new_v4(),
            customer_name: "Ada Harper".to_string(),
            customer_email: "ada@example.com".to_string(),
            event_name: "Winter retreat".to_string(),
            arrival_date: date,
            departure_date: date,
            headcount: 12,
            is_overnight,
            catering_required,
            accommodation_requests,
            notes: None,
            status: BookingStatus::Pending,
            approved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn room(type_name: &str) -> RoomWithAssignment {
        RoomWithAssignment {
            room_id: Uuid::new_v4(),
            room_number: "1".to_string(),
            room_type_name: type_name.to_string(),
            extra_bed_allowed: false,
            ensuite_available: false,
            private_study_available: false,
            selection: None,
        }
    }

    fn fully_equipped(type_name: &str, selection: AssignmentSelection) -> RoomWithAssignment {
        RoomWithAssignment {
            extra_bed_allowed: true,
            ensuite_available: true,
            private_study_available: true,
            selection: Some(selection),
            ..room(type_name)
        }
    }

    fn selected(extra_bed: bool, ensuite: bool, private_study: bool) -> AssignmentSelection {
        AssignmentSelection {
            extra_bed_selected: Some(extra_bed),
            ensuite_selected: Some(ensuite),
            private_study_selected: Some(private_study),
        }
    }

    fn meal_job(caterer: Option<Uuid>) -> MealJob {
        MealJob {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            meal_type: MealType::Lunch,
            service_date: NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
            headcount: 12,
            assigned_caterer_id: caterer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn single_category(rooms: &[RoomWithAssignment]) -> Option<RoomClassification> {
        assert_eq!(rooms.len(), 1);
        classify_room(&rooms[0])
    }

    #[test]
    fn test_day_use_booking_always_passes_with_zero_counts() {
        let requests = AccommodationRequests {
            double_bb: 4,
            single_bb: 2,
            ..Default::default()
        };
        let rooms = vec![room("Single"), room("Queen")];

        let check = validate_room_allocation(false, &requests, &rooms);

        assert!(check.passed);
        assert_eq!(check, RoomAllocationCheck::not_required());
        assert_eq!(check.total_requested, 0);
        assert_eq!(check.total_allocated, 0);
    }

    #[test]
    fn test_singles_without_selection_cover_single_request() {
        let requests = AccommodationRequests {
            single_bb: 2,
            ..Default::default()
        };
        let rooms = vec![room("Single"), room("Single")];

        let check = validate_room_allocation(true, &requests, &rooms);

        assert_eq!(check.categories.single_bb.allocated, 2);
        assert_eq!(check.categories.single_bb.requested, 2);
        assert!(check.passed);
    }

    #[test]
    fn test_twin_single_extra_bed_counts_three_only_when_allowed() {
        let mut twin = fully_equipped("Twin Single", selected(true, false, false));
        assert_eq!(
            classify_room(&twin),
            Some(RoomClassification {
                category: RoomCategory::SingleBb,
                units: 3
            })
        );

        twin.extra_bed_allowed = false;
        assert_eq!(
            classify_room(&twin),
            Some(RoomClassification {
                category: RoomCategory::SingleBb,
                units: 2
            })
        );

        let check = validate_room_allocation(true, &AccommodationRequests::default(), &[twin]);
        assert_eq!(check.categories.single_bb.allocated, 2);
    }

    #[test]
    fn test_queen_with_ensuite_and_study_is_study_suite() {
        let rooms = vec![fully_equipped("Queen", selected(false, true, true))];
        assert_eq!(
            single_category(&rooms).map(|c| c.category),
            Some(RoomCategory::StudySuite)
        );

        let check = validate_room_allocation(
            true,
            &AccommodationRequests {
                study_suite: 1,
                ..Default::default()
            },
            &rooms,
        );
        assert_eq!(check.categories.study_suite.allocated, 1);
        assert_eq!(check.categories.double_ensuite.allocated, 0);
        assert_eq!(check.categories.double_bb.allocated, 0);
        assert!(check.passed);
    }

    #[test]
    fn test_king_with_ensuite_only_is_double_ensuite() {
        let king = RoomWithAssignment {
            ensuite_available: true,
            selection: Some(AssignmentSelection {
                ensuite_selected: Some(true),
                ..Default::default()
            }),
            ..room("King")
        };
        assert_eq!(
            classify_room(&king).map(|c| c.category),
            Some(RoomCategory::DoubleEnsuite)
        );
    }

    #[test]
    fn test_study_selected_but_unavailable_falls_through() {
        // Study selected, room has none: ensuite without study
        let queen = RoomWithAssignment {
            ensuite_available: true,
            selection: Some(selected(false, true, true)),
            ..room("Queen")
        };
        assert_eq!(
            classify_room(&queen).map(|c| c.category),
            Some(RoomCategory::DoubleEnsuite)
        );

        // Neither ensuite nor study effective: plain double
        let double = fully_equipped("Double", selected(false, false, true));
        assert_eq!(
            classify_room(&double).map(|c| c.category),
            Some(RoomCategory::DoubleBb)
        );
    }

    #[test]
    fn test_twin_single_with_ensuite_counts_as_double_ensuite() {
        let twin = fully_equipped("Twin Single", selected(true, true, false));
        assert_eq!(
            classify_room(&twin),
            Some(RoomClassification {
                category: RoomCategory::DoubleEnsuite,
                units: 1
            })
        );
    }

    #[test]
    fn test_type_name_matching_is_case_sensitive() {
        assert_eq!(classify_room(&room("queen")), None);
        assert_eq!(classify_room(&room("single")), None);
        assert_eq!(
            classify_room(&room("Superior King")).map(|c| c.category),
            Some(RoomCategory::DoubleBb)
        );
    }

    #[test]
    fn test_unclassified_rooms_are_ignored() {
        let requests = AccommodationRequests {
            single_bb: 1,
            ..Default::default()
        };
        let check = validate_room_allocation(true, &requests, &[room("Dormitory")]);
        assert_eq!(check.total_allocated, 0);
        assert!(!check.passed);
    }

    #[test]
    fn test_surplus_in_one_category_does_not_cover_another() {
        let requests = AccommodationRequests {
            double_bb: 1,
            ..Default::default()
        };
        let rooms = vec![room("Single"), room("Single")];

        let check = validate_room_allocation(true, &requests, &rooms);

        assert_eq!(check.total_allocated, 2);
        assert_eq!(check.total_requested, 1);
        assert!(!check.passed);
    }

    #[test]
    fn test_catering_empty_list_passes() {
        let jobs: Vec<MealJob> = Vec::new();
        assert_eq!(
            validate_catering_assignments(&jobs),
            CateringAssignmentCheck {
                total_meals: 0,
                assigned_meals: 0,
                unassigned_meals: 0,
                passed: true,
            }
        );
    }

    #[test]
    fn test_catering_partial_assignment_fails() {
        let caterer = Uuid::new_v4();
        let jobs = vec![
            meal_job(Some(caterer)),
            meal_job(Some(caterer)),
            meal_job(None),
        ];
        assert_eq!(
            validate_catering_assignments(&jobs),
            CateringAssignmentCheck {
                total_meals: 3,
                assigned_meals: 2,
                unassigned_meals: 1,
                passed: false,
            }
        );
    }

    #[test]
    fn test_catering_accepts_enriched_jobs() {
        let jobs = vec![MealJobWithCaterer {
            meal_job: meal_job(Some(Uuid::new_v4())),
            caterer_name: Some("Hearth & Co".to_string()),
        }];
        assert!(validate_catering_assignments(&jobs).passed);
    }

    #[test]
    fn test_space_conflict_count() {
        assert!(validate_space_conflicts(0).passed);

        let check = validate_space_conflicts(1);
        assert!(!check.passed);
        assert_eq!(check.conflict_count, 1);
    }

    #[test]
    fn test_catering_not_required_ignores_meal_jobs() {
        let booking = booking(false, AccommodationRequests::default(), false);
        let jobs = vec![meal_job(None), meal_job(None)];

        let checks = validate_booking_for_approval(&booking, &[], &jobs, 0);

        assert_eq!(
            checks.catering_assignment,
            CateringAssignmentCheck::not_required()
        );
        assert_eq!(checks.catering_assignment.total_meals, 0);
        assert!(checks.all_passed());
    }

    #[test]
    fn test_end_to_end_ready_booking() {
        let booking = booking(
            true,
            AccommodationRequests {
                double_bb: 1,
                single_bb: 2,
                study_suite: 0,
                double_ensuite: 0,
            },
            true,
        );
        let rooms = vec![room("Double"), room("Single"), room("Single")];
        let caterer = Uuid::new_v4();
        let jobs = vec![meal_job(Some(caterer)), meal_job(Some(caterer))];

        let checks = validate_booking_for_approval(&booking, &rooms, &jobs, 0);

        assert!(checks.space_conflicts.passed);
        assert!(checks.room_allocation.passed);
        assert!(checks.catering_assignment.passed);
        assert!(checks.all_passed());
        assert!(checks.failures().is_empty());
    }

    #[test]
    fn test_failures_describe_each_failing_check() {
        let booking = booking(
            true,
            AccommodationRequests {
                study_suite: 1,
                ..Default::default()
            },
            true,
        );
        let jobs = vec![meal_job(None)];

        let checks = validate_booking_for_approval(&booking, &[], &jobs, 2);

        assert!(!checks.all_passed());
        assert_eq!(
            checks.failures(),
            vec![
                "2 space reservation conflict(s)".to_string(),
                "studySuite: 0 / 1 rooms allocated".to_string(),
                "total: 0 / 1 rooms allocated".to_string(),
                "1 of 1 meal job(s) without a caterer".to_string(),
            ]
        );
    }

    #[test]
    fn test_checklist_serializes_category_keys() {
        let check = validate_room_allocation(
            true,
            &AccommodationRequests {
                double_ensuite: 1,
                ..Default::default()
            },
            &[],
        );
        let json = serde_json::to_value(check).unwrap();
        assert_eq!(json["categories"]["doubleEnsuite"]["requested"], 1);
        assert_eq!(json["categories"]["doubleEnsuite"]["allocated"], 0);
        assert_eq!(json["passed"], false);
    }
}
