//! Clubs with their athletes, officials and relays

use super::{Contact, MeetInfo};
use crate::schema::entity::entity;
use crate::schema::Requirement::{Always, Soft, When};
use crate::schema::Scope;

entity! {
    /// `CLUB`: a club, national team or the pseudo club for unattached athletes
    pub struct Club: "CLUB" {
        attributes {
            name: "name" => When(club_name_required),
            name_en: "name.en",
            short_name: "shortname",
            short_name_en: "shortname.en",
            code: "code",
            nation: "nation",
            number: "number",
            region: "region",
            swrid: "swrid",
            club_type: "type",
        }
        associations {
            contact: one Contact,
            athletes: many Athlete,
            officials: many Official,
            relays: many Relay,
        }
    }
}

/// Unattached athletes are grouped under a nameless club
fn club_name_required(scope: &Scope<'_>) -> bool {
    scope.attribute("type") != Some("UNATTACHED")
}

entity! {
    pub struct Athlete: "ATHLETE" {
        attributes {
            athlete_id: "athleteid" => Always,
            birthdate: "birthdate" => Always,
            first_name: "firstname" => Always,
            first_name_en: "firstname.en",
            gender: "gender" => Always,
            last_name: "lastname" => Always,
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
            handicap: one Handicap,
            entries: many Entry,
            results: many SwimResult,
        }
    }
}

entity! {
    /// `HANDICAP`: para-swimming sport classes
    ///
    /// `breast` is required by the format, but files in the wild often omit
    /// it, so a missing value is only reported.
    pub struct Handicap: "HANDICAP" {
        attributes {
            breast: "breast" => Soft,
            breast_status: "breaststatus",
            exception: "exception",
            free: "free",
            free_status: "freestatus",
            medley: "medley",
            medley_status: "medleystatus",
        }
    }
}

entity! {
    /// `ENTRY` of an individual athlete
    pub struct Entry: "ENTRY" {
        attributes {
            age_group_id: "agegroupid",
            entry_course: "entrycourse",
            entry_distance: "entrydistance",
            entry_time: "entrytime",
            event_id: "eventid" => Always,
            handicap: "handicap",
            heat_id: "heatid",
            lane: "lane",
            status: "status",
        }
        associations {
            meet_info: one MeetInfo,
        }
    }
}

entity! {
    /// `RESULT` of an individual athlete
    pub struct SwimResult: "RESULT" {
        attributes {
            comment: "comment",
            entry_course: "entrycourse",
            entry_time: "entrytime",
            event_id: "eventid",
            handicap: "handicap",
            heat_id: "heatid",
            lane: "lane",
            points: "points",
            reaction_time: "reactiontime",
            result_id: "resultid" => Always,
            status: "status",
            swim_distance: "swimdistance",
            swim_time: "swimtime" => Always,
        }
        associations {
            splits: many Split,
        }
    }
}

entity! {
    /// `SPLIT`: intermediate time at a distance
    pub struct Split: "SPLIT" {
        attributes {
            distance: "distance" => Always,
            swim_time: "swimtime" => Always,
        }
    }
}

entity! {
    /// `OFFICIAL`: referee, timekeeper and so on
    pub struct Official: "OFFICIAL" {
        attributes {
            first_name: "firstname" => Always,
            gender: "gender",
            grade: "grade",
            last_name: "lastname" => Always,
            license: "license",
            name_prefix: "nameprefix",
            nation: "nation",
            official_id: "officialid" => Always,
            passport: "passport",
        }
        associations {
            contact: one Contact,
        }
    }
}

entity! {
    /// `RELAY`: a relay team of a club
    pub struct Relay: "RELAY" {
        attributes {
            age_max: "agemax" => Always,
            age_min: "agemin" => Always,
            age_total_max: "agetotalmax" => Always,
            age_total_min: "agetotalmin" => Always,
            gender: "gender" => Always,
            handicap: "handicap",
            name: "name",
            number: "number",
        }
        associations {
            relay_positions: many RelayPosition,
            entries: many RelayEntry,
            results: many RelayResult,
        }
    }
}

entity! {
    /// `RELAYPOSITION`: one leg of a relay
    pub struct RelayPosition: "RELAYPOSITION" {
        attributes {
            athlete_id: "athleteid",
            number: "number" => Always,
            reaction_time: "reactiontime",
            status: "status",
        }
        associations {
            athlete: one Athlete,
            meet_info: one MeetInfo,
        }
    }
}

entity! {
    /// `ENTRY` of a relay team
    pub struct RelayEntry: "ENTRY" {
        attributes {
            age_group_id: "agegroupid",
            entry_course: "entrycourse",
            entry_distance: "entrydistance",
            entry_time: "entrytime",
            event_id: "eventid" => Always,
            handicap: "handicap",
            heat_id: "heatid",
            lane: "lane",
            status: "status",
        }
        associations {
            meet_info: one MeetInfo,
            relay_positions: many RelayPosition,
        }
    }
}

entity! {
    /// `RESULT` of a relay team
    pub struct RelayResult: "RESULT" {
        attributes {
            comment: "comment",
            event_id: "eventid",
            handicap: "handicap",
            heat_id: "heatid",
            lane: "lane",
            points: "points",
            reaction_time: "reactiontime",
            result_id: "resultid" => Always,
            status: "status",
            swim_distance: "swimdistance",
            swim_time: "swimtime" => Always,
        }
        associations {
            relay_positions: many RelayPosition,
            splits: many Split,
        }
    }
}

impl Athlete {
    /// Entry of this athlete for the given event id
    pub fn entry_for(&self, event_id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.event_id.as_deref() == Some(event_id))
    }
}
