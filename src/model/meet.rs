//! Meet and its descriptive children

use super::club::Club;
use super::session::{Fee, Pool, Session};
use super::Contact;
use crate::schema::entity::entity;
use crate::schema::Requirement::Always;

entity! {
    /// `MEET`: one competition with its clubs and sessions
    pub struct Meet: "MEET" {
        attributes {
            name: "name" => Always,
            name_en: "name.en",
            city: "city" => Always,
            city_en: "city.en",
            nation: "nation" => Always,
            course: "course",
            number: "number",
            reserve_count: "reservecount",
            start_method: "startmethod",
            timing: "timing",
            touchpad_mode: "touchpadmode",
            meet_type: "type",
            entry_type: "entrytype",
            max_entries_athlete: "maxentriesathlete",
            max_entries_relay: "maxentriesrelay",
            altitude: "altitude",
            swrid: "swrid",
            result_url: "result.url",
        }
        associations {
            contact: one Contact,
            age_date: one AgeDate,
            bank: one Bank,
            facility: one Facility,
            point_table: one PointTable,
            qualify: one Qualify,
            pool: one Pool,
            fees: many Fee,
            host_club: inline HostClub,
            organizer: inline Organizer,
            entry_schedule: inline EntrySchedule,
            clubs: many Club,
            sessions: many Session,
        }
    }
}

entity! {
    /// `AGEDATE`: reference date for age calculation
    pub struct AgeDate: "AGEDATE" {
        attributes {
            date_type: "type" => Always,
            value: "value" => Always,
        }
    }
}

entity! {
    pub struct Bank: "BANK" {
        attributes {
            account_holder: "accountholder",
            bic: "bic",
            iban: "iban" => Always,
            name: "name",
            note: "note",
        }
    }
}

entity! {
    /// `FACILITY`: venue address
    pub struct Facility: "FACILITY" {
        attributes {
            city: "city" => Always,
            nation: "nation" => Always,
            name: "name",
            state: "state",
            street: "street",
            street2: "street2",
            zip: "zip",
        }
    }
}

entity! {
    pub struct PointTable: "POINTTABLE" {
        attributes {
            name: "name" => Always,
            point_table_id: "pointtableid",
            version: "version" => Always,
        }
    }
}

entity! {
    /// `QUALIFY`: qualification period
    pub struct Qualify: "QUALIFY" {
        attributes {
            conversion: "conversion",
            from: "from" => Always,
            percent: "percent",
            until: "until",
        }
    }
}

entity! {
    /// Host club, stored as `hostclub`/`hostclub.url` on `MEET`
    pub struct HostClub: "MEET" {
        attributes {
            name: "hostclub",
            url: "hostclub.url",
        }
    }
}

entity! {
    /// Organizer, stored as `organizer`/`organizer.url` on `MEET`
    pub struct Organizer: "MEET" {
        attributes {
            name: "organizer",
            url: "organizer.url",
        }
    }
}

entity! {
    /// Entry window, stored as attributes on `MEET`
    pub struct EntrySchedule: "MEET" {
        attributes {
            entry_start_date: "entrystartdate",
            withdraw_until: "withdrawuntil",
            deadline_date: "deadline",
            deadline_time: "deadlinetime",
        }
    }
}
