//! Candidate builder — maps flat applicant fields to the aggregation API's candidate object.

use crate::applications::models::{
    is_present, non_empty, Address, Candidate, CandidateFields, Education, Email, Phone, PERSONAL,
};

const DEFAULT_DEGREE: &str = "bachelors degree";
const DEFAULT_MAJOR: &str = "General";
const DEFAULT_INSTITUTE: &str = "University";

/// Builds the candidate object. Pure; presence rules:
/// - phone and email always become single `PERSONAL` entries
/// - education appears only when degree, major or institute is set
/// - the present address appears only when one of its five parts is set
/// - work and permanent addresses are forwarded untouched
pub fn build_candidate(fields: &CandidateFields) -> Candidate {
    Candidate {
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        phones: vec![Phone {
            kind: PERSONAL.to_string(),
            phone_number: fields.phone.clone(),
        }],
        emails: vec![Email {
            kind: PERSONAL.to_string(),
            email: fields.email.clone(),
        }],
        title: non_empty(&fields.title).map(str::to_string),
        company: non_empty(&fields.company).map(str::to_string),
        links: fields.links.clone().filter(|links| !links.is_empty()),
        education: build_education(fields).map(|e| vec![e]),
        present_address: build_present_address(fields),
        work_address: fields
            .work_address
            .clone()
            .filter(|_| is_present(&fields.work_address)),
        permanent_address: fields
            .permanent_address
            .clone()
            .filter(|_| is_present(&fields.permanent_address)),
    }
}

fn build_education(fields: &CandidateFields) -> Option<Education> {
    let degree = non_empty(&fields.degree);
    let major = non_empty(&fields.major);
    let institute = non_empty(&fields.institute);

    if degree.is_none() && major.is_none() && institute.is_none() {
        return None;
    }

    Some(Education {
        id: "1".to_string(),
        degree: degree.unwrap_or(DEFAULT_DEGREE).to_string(),
        currently_pursuing: fields.currently_pursuing.unwrap_or(true),
        major: major.unwrap_or(DEFAULT_MAJOR).to_string(),
        institute: institute.unwrap_or(DEFAULT_INSTITUTE).to_string(),
    })
}

fn build_present_address(fields: &CandidateFields) -> Option<Address> {
    let parts = [
        &fields.address_line1,
        &fields.city,
        &fields.state,
        &fields.country,
        &fields.zip_code,
    ];
    if parts.iter().all(|part| non_empty(part).is_none()) {
        return None;
    }

    let or_blank = |part: &Option<String>| non_empty(part).unwrap_or_default().to_string();
    Some(Address {
        address_line1: or_blank(&fields.address_line1),
        city: or_blank(&fields.city),
        state: or_blank(&fields.state),
        country: or_blank(&fields.country),
        zip_code: or_blank(&fields.zip_code),
    })
}
