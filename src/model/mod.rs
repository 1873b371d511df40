//! Model Module - the LENEX entity catalog
//!
//! Every type here is declared through `entity!`, so the same declaration
//! drives building from XML and writing back to XML.

pub mod club;
pub mod constructor;
pub mod meet;
pub mod records;
pub mod session;

pub use club::{
    Athlete, Club, Entry, Handicap, Official, Relay, RelayEntry, RelayPosition, RelayResult, Split,
    SwimResult,
};
pub use constructor::{Constructor, Contact};
pub use meet::{AgeDate, Bank, EntrySchedule, Facility, HostClub, Meet, Organizer, PointTable, Qualify};
pub use records::{
    Record, RecordAthlete, RecordList, RecordRelay, RecordRelayPosition, TimeStandard, TimeStandardList,
};
pub use session::{AgeGroup, Event, Fee, Heat, Judge, MeetInfo, Pool, Ranking, Session, SwimStyle, TimeStandardRef};
