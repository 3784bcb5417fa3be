use super::{ADMIN_TOOLS, CREATE_PERSON, EDIT_FAQ, EDIT_NEWS, MAIN, MUSTER, PERSON};
use crate::identity::{fields_of, FieldRef};
use crate::level::AccessLevel;
use crate::role::{DomainBlock, FieldRuleSet, Role};

const USERS: &str = "Users";
const LPOS: &str = "LPOs";
const DIVISION_LEADERSHIP: &str = "DivisionLeadership";
const DEPARTMENT_LEADERSHIP: &str = "DepartmentLeadership";
const COMMAND_LEADERSHIP: &str = "CommandLeadership";
const ADMIN: &str = "Admin";
const DEVELOPERS: &str = "Developers";

const PUBLIC_PROFILE: &[&str] = &[
    "Id",
    "LastName",
    "FirstName",
    "MiddleName",
    "Suffix",
    "Remarks",
    "Supervisor",
    "WorkCenter",
    "WorkRoom",
];

const OWN_NAME: &[&str] = &["FirstName", "LastName", "MiddleName"];

const DIVISION_ROSTER: &[&str] = &[
    "Id",
    "LastName",
    "FirstName",
    "MiddleName",
    "Suffix",
    "DateOfBirth",
    "Sex",
    "Remarks",
    "Ethnicity",
    "Paygrade",
    "Designation",
    "Division",
    "Department",
    "Command",
    "NECs",
    "Supervisor",
    "WorkCenter",
    "WorkRoom",
    "Shift",
    "WorkRemarks",
    "DutyStatus",
    "UIC",
    "DateOfArrival",
    "JobTitle",
    "EAOS",
    "DateOfDeparture",
    "CurrentMusterStatus",
    "ContactRemarks",
    "IsClaimed",
    "PermissionGroupNames",
];

const LEADERSHIP_RETURN: &[&str] = &[
    "Id",
    "LastName",
    "FirstName",
    "MiddleName",
    "Suffix",
    "DateOfBirth",
    "Sex",
    "Remarks",
    "Ethnicity",
    "ReligiousPreference",
    "Paygrade",
    "Designation",
    "Division",
    "Department",
    "Command",
    "NECs",
    "Supervisor",
    "WorkCenter",
    "WorkRoom",
    "Shift",
    "WorkRemarks",
    "DutyStatus",
    "UIC",
    "DateOfArrival",
    "JobTitle",
    "EAOS",
    "DateOfDeparture",
    "CurrentMusterStatus",
    "EmailAddresses",
    "PhoneNumbers",
    "PhysicalAddresses",
    "EmergencyContactInstructions",
    "ContactRemarks",
    "IsClaimed",
    "Username",
    "PermissionGroupNames",
    "AccountHistory",
    "Changes",
];

const LEADERSHIP_EDIT: &[&str] = &[
    "LastName",
    "FirstName",
    "MiddleName",
    "Suffix",
    "DateOfBirth",
    "Sex",
    "Remarks",
    "Ethnicity",
    "Paygrade",
    "Designation",
    "Division",
    "Department",
    "Supervisor",
    "WorkCenter",
    "WorkRoom",
    "Shift",
    "WorkRemarks",
    "JobTitle",
    "CurrentMusterStatus",
    "EmailAddresses",
    "PhoneNumbers",
    "PhysicalAddresses",
    "EmergencyContactInstructions",
    "ContactRemarks",
];

const SENSITIVE_RETURN: &[&str] = &[
    "SSN",
    "DateOfBirth",
    "Ethnicity",
    "ReligiousPreference",
    "PrimaryNEC",
    "SecondaryNECs",
    "WorkRemarks",
    "DutyStatus",
    "DateOfArrival",
    "JobTitle",
    "EAOS",
    "DateOfDeparture",
    "EmailAddresses",
    "PhoneNumbers",
    "PhysicalAddresses",
    "ContactRemarks",
    "IsClaimed",
    "Username",
    "PermissionGroupNames",
    "AccountHistory",
    "Changes",
];

const RECORD_EDIT: &[&str] = &[
    "LastName",
    "FirstName",
    "MiddleName",
    "SSN",
    "Suffix",
    "DateOfBirth",
    "Sex",
    "Remarks",
    "Ethnicity",
    "ReligiousPreference",
    "Paygrade",
    "Designation",
    "Division",
    "Department",
    "Command",
    "PrimaryNEC",
    "SecondaryNECs",
    "Supervisor",
    "WorkCenter",
    "WorkRoom",
    "Shift",
    "WorkRemarks",
    "DutyStatus",
    "UIC",
    "DateOfArrival",
    "JobTitle",
    "EAOS",
    "DateOfDeparture",
    "CurrentMusterStatus",
    "EmailAddresses",
    "PhoneNumbers",
    "PhysicalAddresses",
    "EmergencyContactInstructions",
    "ContactRemarks",
];

// Training and account fields only developers manage.
const DEVELOPER_EXTRAS: &[&str] = &[
    "PRD",
    "WatchQualifications",
    "GTCTrainingDate",
    "HasCompletedAWARE",
    "ADAMSTrainingDate",
    "DoDId",
];

fn person(names: &[&str]) -> impl Iterator<Item = FieldRef> {
    fields_of(PERSON, names).into_iter()
}

fn leadership_main() -> DomainBlock {
    DomainBlock::new(MAIN)
        .grant(FieldRuleSet::returnable(person(LEADERSHIP_RETURN)).if_superior_in(MAIN))
        .grant(FieldRuleSet::edit(person(LEADERSHIP_EDIT)))
}

/// Everyone. Public profile fields, plus their own SSN and name edits.
pub fn users() -> Role {
    Role::builder(USERS)
        .default_role()
        .access_level(AccessLevel::SelfOnly)
        .accessible_features([EDIT_NEWS])
        .domain(
            DomainBlock::new(MAIN)
                .grant(FieldRuleSet::returnable(person(PUBLIC_PROFILE)))
                .grant(FieldRuleSet::returnable(person(&["SSN"])).if_self())
                .grant(FieldRuleSet::edit(person(OWN_NAME)).if_self()),
        )
        .build()
}

/// Leading petty officers: read-only division roster.
pub fn lpos() -> Role {
    Role::builder(LPOS)
        .access_level(AccessLevel::Division)
        .domain(DomainBlock::new(MAIN).grant(FieldRuleSet::returnable(person(DIVISION_ROSTER))))
        .domain(DomainBlock::new(MUSTER))
        .build()
}

/// Division officers and chiefs.
pub fn division_leadership() -> Role {
    Role::builder(DIVISION_LEADERSHIP)
        .access_level(AccessLevel::Division)
        .administers([USERS, DIVISION_LEADERSHIP])
        .domain(leadership_main())
        .domain(DomainBlock::new(MUSTER))
        .build()
}

pub fn department_leadership() -> Role {
    Role::builder(DEPARTMENT_LEADERSHIP)
        .access_level(AccessLevel::Department)
        .administers([USERS, DIVISION_LEADERSHIP, DEPARTMENT_LEADERSHIP])
        .domain(leadership_main())
        .domain(DomainBlock::new(MUSTER))
        .build()
}

/// Commanding officer, executive officer and command master chief.
pub fn command_leadership() -> Role {
    Role::builder(COMMAND_LEADERSHIP)
        .access_level(AccessLevel::Command)
        .accessible_features([EDIT_NEWS, ADMIN_TOOLS, CREATE_PERSON])
        .administers([
            USERS,
            DIVISION_LEADERSHIP,
            DEPARTMENT_LEADERSHIP,
            COMMAND_LEADERSHIP,
            ADMIN,
        ])
        .domain(leadership_main())
        .domain(DomainBlock::new(MUSTER))
        .build()
}

/// Command administrators: sensitive fields, but only inside their command.
pub fn admin() -> Role {
    Role::builder(ADMIN)
        .access_level(AccessLevel::Command)
        .accessible_features([EDIT_NEWS, ADMIN_TOOLS, CREATE_PERSON])
        .administers([USERS, DIVISION_LEADERSHIP, DEPARTMENT_LEADERSHIP, ADMIN])
        .domain(
            DomainBlock::new(MAIN)
                .grant(FieldRuleSet::returnable(person(SENSITIVE_RETURN)).if_superior_in(MAIN))
                .grant(FieldRuleSet::edit(person(RECORD_EDIT)).if_superior_in(MAIN)),
        )
        .domain(DomainBlock::new(MUSTER))
        .build()
}

/// System developers: everything, everywhere.
pub fn developers() -> Role {
    let returnable = SENSITIVE_RETURN.iter().chain(DEVELOPER_EXTRAS).copied();
    let editable = RECORD_EDIT
        .iter()
        .chain(&["Username", "PermissionGroupNames"])
        .chain(DEVELOPER_EXTRAS)
        .copied();

    Role::builder(DEVELOPERS)
        .access_level(AccessLevel::Command)
        .accessible_features([EDIT_NEWS, ADMIN_TOOLS, CREATE_PERSON, EDIT_FAQ])
        .administers([
            USERS,
            DIVISION_LEADERSHIP,
            DEPARTMENT_LEADERSHIP,
            COMMAND_LEADERSHIP,
            ADMIN,
            DEVELOPERS,
        ])
        .domain(
            DomainBlock::new(MAIN)
                .grant(FieldRuleSet::returnable(
                    returnable.map(|name| FieldRef::new(PERSON, name)),
                ))
                .grant(FieldRuleSet::edit(
                    editable.map(|name| FieldRef::new(PERSON, name)),
                )),
        )
        .domain(DomainBlock::new(MUSTER))
        .build()
}
