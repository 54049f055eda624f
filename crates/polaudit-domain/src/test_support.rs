use polaudit_types::{ids, PolicyRecord};

pub fn sis(id: &str, role: &str, action: &str, owner: bool) -> PolicyRecord {
    PolicyRecord::new(id, ids::POLICY_SIS)
        .with("role", role)
        .with("action", action)
        .with("owner", owner)
}

pub fn exam(id: &str, create: bool, grade: bool, invigilate: bool) -> PolicyRecord {
    PolicyRecord::new(id, ids::POLICY_EXAM)
        .with("create", create)
        .with("grade", grade)
        .with("invigilate", invigilate)
}

pub fn lab(id: &str, system: &str, on_campus: bool, hour: i64) -> PolicyRecord {
    PolicyRecord::new(id, ids::POLICY_LAB)
        .with("system", system)
        .with("on_campus", on_campus)
        .with("hour", hour)
}

pub fn privacy(
    id: &str,
    access_requested: bool,
    status: &str,
    role: &str,
    action: &str,
) -> PolicyRecord {
    PolicyRecord::new(id, ids::POLICY_PRIVACY)
        .with("access_requested", access_requested)
        .with("status", status)
        .with("role", role)
        .with("action", action)
}
