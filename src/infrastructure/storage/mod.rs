//! In-memory storage

mod memory;

pub use memory::{
    InMemoryBookingRepository, InMemoryUnitOfWork, FAIL_GET_ROOM_ID, FAIL_LIST_ROOMS_ID,
    FAIL_RESERVATION_ROOM_ID, FAIL_RESTRICTION_ROOM_ID, FAIL_ROOM_AVAILABILITY_ID,
    FAIL_SEARCH_BEFORE_YEAR,
};
