//! Booking domain entities

use chrono::{DateTime, NaiveDate, Utc};

/// Restriction type recorded for every room restriction created by a booking.
///
/// The catalog also holds "Owner Block" (2) but nothing selects it yet.
pub const RESERVATION_RESTRICTION_ID: i32 = 1;

/// Half-open interval intersection: `[start, end)` against `[other_start, other_end)`.
pub fn ranges_overlap(
    start: NaiveDate,
    end: NaiveDate,
    other_start: NaiveDate,
    other_end: NaiveDate,
) -> bool {
    start < other_end && end > other_start
}

/// A bookable room. Read-only for the booking engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i32,
    pub room_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: i32, room_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            room_name: room_name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional equality filters for listing rooms. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub id: Option<i32>,
    pub room_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        self.id.map_or(true, |id| room.id == id)
            && self
                .room_name
                .as_deref()
                .map_or(true, |name| room.room_name == name)
            && self.created_at.map_or(true, |ts| room.created_at == ts)
            && self.updated_at.map_or(true, |ts| room.updated_at == ts)
    }
}

/// Booking request data, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
}

/// A persisted reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn from_new(id: i32, new: &NewReservation, now: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
            room_id: new.room_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Restriction row to insert alongside a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomRestriction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub reservation_id: i32,
    pub restriction_id: i32,
}

impl NewRoomRestriction {
    /// The restriction a booking produces: same room, same dates.
    pub fn for_reservation(reservation: &NewReservation, reservation_id: i32) -> Self {
        Self {
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            room_id: reservation.room_id,
            reservation_id,
            restriction_id: RESERVATION_RESTRICTION_ID,
        }
    }
}

/// A persisted date-range block on a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRestriction {
    pub id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room_id: i32,
    pub reservation_id: i32,
    pub restriction_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomRestriction {
    pub fn from_new(id: i32, new: &NewRoomRestriction, now: DateTime<Utc>) -> Self {
        Self {
            id,
            start_date: new.start_date,
            end_date: new.end_date,
            room_id: new.room_id,
            reservation_id: new.reservation_id,
            restriction_id: new.restriction_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this block intersects `[start, end)`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        ranges_overlap(start, end, self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_request() -> NewReservation {
        NewReservation {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "johndoe@example.com".into(),
            phone: "+234-000-000-0000".into(),
            start_date: date("2024-03-30"),
            end_date: date("2024-04-30"),
            room_id: 1,
        }
    }

    #[test]
    fn restriction_copies_dates_and_room_from_reservation() {
        let req = sample_request();
        let r = NewRoomRestriction::for_reservation(&req, 17);
        assert_eq!(r.start_date, req.start_date);
        assert_eq!(r.end_date, req.end_date);
        assert_eq!(r.room_id, 1);
        assert_eq!(r.reservation_id, 17);
        assert_eq!(r.restriction_id, RESERVATION_RESTRICTION_ID);
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        // checkout day == next check-in day
        assert!(!ranges_overlap(
            date("2024-06-06"),
            date("2024-06-10"),
            date("2024-06-01"),
            date("2024-06-06"),
        ));
        assert!(!ranges_overlap(
            date("2024-05-25"),
            date("2024-06-01"),
            date("2024-06-01"),
            date("2024-06-06"),
        ));
    }

    #[test]
    fn contained_and_partial_ranges_overlap() {
        let (s, e) = (date("2024-06-01"), date("2024-06-10"));
        assert!(ranges_overlap(date("2024-06-03"), date("2024-06-04"), s, e));
        assert!(ranges_overlap(date("2024-05-30"), date("2024-06-02"), s, e));
        assert!(ranges_overlap(date("2024-06-09"), date("2024-06-12"), s, e));
        assert!(ranges_overlap(date("2024-05-01"), date("2024-07-01"), s, e));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let room = Room::new(1, "General's Quarters");
        assert!(RoomFilter::default().matches(&room));
    }

    #[test]
    fn filter_fields_are_conjunctive() {
        let room = Room::new(2, "Major's Suite");
        let by_id = RoomFilter {
            id: Some(2),
            ..Default::default()
        };
        assert!(by_id.matches(&room));

        let wrong_name = RoomFilter {
            id: Some(2),
            room_name: Some("General's Quarters".into()),
            ..Default::default()
        };
        assert!(!wrong_name.matches(&room));
    }
}
