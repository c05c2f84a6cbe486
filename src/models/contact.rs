use serde::{Deserialize, Serialize};
use std::fmt;

/// Listing agent or vendor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: Option<String>,
    pub name: String,
    pub business_phone: Option<String>,
    pub after_hours_phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub email: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Person {
    pub fn set_phone(&mut self, kind: PhoneType, number: impl Into<String>) {
        let number = Some(number.into());
        match kind {
            PhoneType::BusinessHours => self.business_phone = number,
            PhoneType::AfterHours => self.after_hours_phone = number,
            PhoneType::Mobile => self.mobile_phone = number,
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Telephone `type` attribute values the feed defines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneType {
    BusinessHours,
    AfterHours,
    Mobile,
}

impl PhoneType {
    /// Unknown codes return `None`; callers drop those numbers.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BH" => Some(Self::BusinessHours),
            "AH" => Some(Self::AfterHours),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

/// Keyed text entry, used for highlights
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdValue {
    pub id: Option<String>,
    pub value: String,
}

impl IdValue {
    pub fn new(id: Option<String>, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_codes_are_case_sensitive() {
        assert_eq!(PhoneType::from_code("BH"), Some(PhoneType::BusinessHours));
        assert_eq!(PhoneType::from_code("AH"), Some(PhoneType::AfterHours));
        assert_eq!(PhoneType::from_code("mobile"), Some(PhoneType::Mobile));
        assert_eq!(PhoneType::from_code("Mobile"), None);
        assert_eq!(PhoneType::from_code("fax"), None);
    }

    #[test]
    fn set_phone_routes_by_type() {
        let mut person = Person::default();
        person.set_phone(PhoneType::Mobile, "0400 000 000");
        person.set_phone(PhoneType::AfterHours, "03 9999 0000");
        assert_eq!(person.mobile_phone.as_deref(), Some("0400 000 000"));
        assert_eq!(person.after_hours_phone.as_deref(), Some("03 9999 0000"));
        assert_eq!(person.business_phone, None);
    }
}
