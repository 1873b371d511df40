//! Record lists and time standard lists

use super::club::{Club, Handicap, Split};
use super::session::{AgeGroup, MeetInfo, SwimStyle};
use crate::schema::entity::entity;
use crate::schema::Requirement::Always;

entity! {
    /// `RECORDLIST`: records for one course, gender and age group
    pub struct RecordList: "RECORDLIST" {
        attributes {
            course: "course" => Always,
            gender: "gender" => Always,
            handicap: "handicap",
            name: "name" => Always,
            nation: "nation",
            order: "order",
            region: "region",
            list_type: "type",
            updated: "updated",
        }
        associations {
            age_group: one AgeGroup,
            records: many Record,
        }
    }
}

entity! {
    pub struct Record: "RECORD" {
        attributes {
            swim_time: "swimtime" => Always,
            status: "status",
            comment: "comment",
        }
        associations {
            meet_info: one MeetInfo,
            swim_style: required SwimStyle,
            athlete: one RecordAthlete,
            relay: one RecordRelay,
            splits: many Split,
        }
    }
}

entity! {
    /// `ATHLETE` holding a record: only gender is mandatory
    pub struct RecordAthlete: "ATHLETE" {
        attributes {
            athlete_id: "athleteid",
            birthdate: "birthdate",
            first_name: "firstname",
            first_name_en: "firstname.en",
            gender: "gender" => Always,
            last_name: "lastname",
            last_name_en: "lastname.en",
            level: "level",
            license: "license",
            license_dbs: "license_dbs",
            license_dsv: "license_dsv",
            license_ipc: "license_ipc",
            name_prefix: "nameprefix",
            nation: "nation",
            passport: "passport",
            status: "status",
            swrid: "swrid",
        }
        associations {
            club: one Club,
            handicap: one Handicap,
        }
    }
}

entity! {
    /// `RELAY` holding a record
    pub struct RecordRelay: "RELAY" {
        attributes {
            name: "name",
        }
        associations {
            club: one Club,
            relay_positions: many RecordRelayPosition,
        }
    }
}

entity! {
    pub struct RecordRelayPosition: "RELAYPOSITION" {
        attributes {
            number: "number" => Always,
            reaction_time: "reactiontime",
            status: "status",
        }
        associations {
            athlete: required RecordAthlete,
        }
    }
}

entity! {
    /// `TIMESTANDARDLIST`: qualification or limit times
    pub struct TimeStandardList: "TIMESTANDARDLIST" {
        attributes {
            course: "course" => Always,
            gender: "gender" => Always,
            handicap: "handicap",
            name: "name" => Always,
            time_standard_list_id: "timestandardlistid" => Always,
            list_type: "type",
        }
        associations {
            age_group: one AgeGroup,
            time_standards: many TimeStandard,
        }
    }
}

entity! {
    pub struct TimeStandard: "TIMESTANDARD" {
        attributes {
            swim_time: "swimtime" => Always,
        }
        associations {
            swim_style: required SwimStyle,
        }
    }
}
