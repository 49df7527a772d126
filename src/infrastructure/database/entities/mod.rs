//! Database entities module

pub mod reservation;
pub mod restriction;
pub mod room;
pub mod room_restriction;

pub use reservation::Entity as Reservation;
pub use restriction::Entity as Restriction;
pub use room::Entity as Room;
pub use room_restriction::Entity as RoomRestriction;
