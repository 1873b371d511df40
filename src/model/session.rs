//! Sessions, events and the shapes they share with entries and records

use crate::schema::entity::entity;
use crate::schema::Requirement::{Always, When};
use crate::schema::Scope;

entity! {
    /// `SESSION`: one block of events on a given day
    pub struct Session: "SESSION" {
        attributes {
            course: "course",
            date: "date" => Always,
            daytime: "daytime",
            end_time: "endtime",
            max_entries_athlete: "maxentriesathlete",
            max_entries_relay: "maxentriesrelay",
            name: "name",
            number: "number" => Always,
            official_meeting: "officialmeeting",
            remarks_judge: "remarksjudge",
            team_leader_meeting: "teamleadermeeting",
            timing: "timing",
            touchpad_mode: "touchpadmode",
            warmup_from: "warmupfrom",
            warmup_until: "warmupuntil",
        }
        associations {
            fees: many Fee,
            pool: one Pool,
            judges: many Judge,
            events: nonempty Event,
        }
    }
}

entity! {
    pub struct Judge: "JUDGE" {
        attributes {
            number: "number",
            official_id: "officialid" => Always,
            remarks: "remarks",
            role: "role",
        }
    }
}

entity! {
    /// `EVENT`: one race of a session
    pub struct Event: "EVENT" {
        attributes {
            daytime: "daytime",
            event_id: "eventid" => Always,
            gender: "gender",
            max_entries: "maxentries",
            number: "number" => Always,
            order: "order",
            previous_event_id: "preveventid",
            round: "round",
            run: "run",
            timing: "timing",
            event_type: "type",
        }
        associations {
            fee: one Fee,
            swim_style: required SwimStyle,
            age_groups: many AgeGroup,
            heats: many Heat,
            time_standard_refs: many TimeStandardRef,
        }
    }
}

entity! {
    /// `SWIMSTYLE`: distance, stroke and relay count of a race
    pub struct SwimStyle: "SWIMSTYLE" {
        attributes {
            code: "code",
            distance: "distance" => Always,
            name: "name",
            relay_count: "relaycount" => Always,
            stroke: "stroke" => Always,
            swim_style_id: "swimstyleid",
            technique: "technique",
        }
    }
}

entity! {
    pub struct Heat: "HEAT" {
        attributes {
            age_group_id: "agegroupid",
            daytime: "daytime",
            final_type: "final",
            heat_id: "heatid" => Always,
            number: "number" => Always,
            order: "order",
            status: "status",
        }
    }
}

entity! {
    /// `AGEGROUP`: age (and optionally level) bracket
    ///
    /// Inside time standard and record lists the group describes the list
    /// itself and carries no id.
    pub struct AgeGroup: "AGEGROUP" {
        attributes {
            age_group_id: "agegroupid" => When(age_group_id_required),
            age_max: "agemax" => Always,
            age_min: "agemin" => Always,
            calculate: "calculate",
            gender: "gender",
            handicap: "handicap",
            level_max: "levelmax",
            level_min: "levelmin",
            levels: "levels",
            name: "name",
        }
        associations {
            rankings: many Ranking,
        }
    }
}

fn age_group_id_required(scope: &Scope<'_>) -> bool {
    !matches!(scope.parent_name(), Some("TIMESTANDARDLIST") | Some("RECORDLIST"))
}

entity! {
    /// `RANKING`: place of a result within an age group
    pub struct Ranking: "RANKING" {
        attributes {
            order: "order",
            place: "place" => Always,
            result_id: "resultid",
        }
    }
}

entity! {
    /// `TIMESTANDARDREF`: link from an event to a time standard list
    pub struct TimeStandardRef: "TIMESTANDARDREF" {
        attributes {
            time_standard_list_id: "timestandardlistid" => Always,
            marker: "marker",
        }
        associations {
            fee: one Fee,
        }
    }
}

entity! {
    pub struct Fee: "FEE" {
        attributes {
            currency: "currency",
            fee_type: "type",
            value: "value" => Always,
        }
    }
}

entity! {
    /// `POOL`: lanes and water temperature
    pub struct Pool: "POOL" {
        attributes {
            lane_max: "lanemax",
            lane_min: "lanemin",
            temperature: "temperature",
            pool_type: "type",
        }
    }
}

entity! {
    /// `MEETINFO`: where and when an entry time or record was swum
    pub struct MeetInfo: "MEETINFO" {
        attributes {
            approved: "approved",
            city: "city",
            course: "course",
            date: "date",
            daytime: "daytime",
            name: "name",
            nation: "nation",
            qualification_time: "qualificationtime",
            state: "state",
            timing: "timing",
        }
        associations {
            pool: one Pool,
        }
    }
}

impl Session {
    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.event_id.as_deref() == Some(event_id))
    }
}
