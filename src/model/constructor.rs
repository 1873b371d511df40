//! Software that produced the file, and contact details

use crate::schema::entity::entity;
use crate::schema::Requirement::{Always, When};
use crate::schema::Scope;

entity! {
    /// `CONSTRUCTOR`: the application that wrote the document
    pub struct Constructor: "CONSTRUCTOR" {
        attributes {
            name: "name" => Always,
            registration: "registration" => Always,
            version: "version" => Always,
        }
        associations {
            contact: required Contact,
        }
    }
}

entity! {
    /// `CONTACT`: postal and electronic contact details
    pub struct Contact: "CONTACT" {
        attributes {
            name: "name",
            street: "street",
            street2: "street2",
            zip: "zip",
            city: "city",
            state: "state",
            country: "country",
            phone: "phone",
            mobile: "mobile",
            fax: "fax",
            email: "email" => When(email_required),
            internet: "internet",
        }
    }
}

/// The constructor's contact must carry an email address
fn email_required(scope: &Scope<'_>) -> bool {
    scope.parent_name() == Some("CONSTRUCTOR")
}
