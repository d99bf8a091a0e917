use std::str::FromStr;

use crate::errors::BannerlinkerError;

/// Known partner organizations. Placements for anyone else must carry the
/// external-partner marker (`partner_type == "+"`) in the upload table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partner {
    Sirius,
    SiriusOlymp,
    Regions,
    OlympRu,
    Fts,
    SiriusJournal,
    Gospublics,
    Ctf,
    Tap,
    SiriusCourses,
    BioCpm,
    Lingnews,
    DiplomaRu,
    Npr,
    Gosuslugi,
    Drd,
    Msu,
    SiriusTeacher,
    EduEnv,
    MinEdu,
    SchoolPartners,
}

impl Partner {
    pub const ALL: [Partner; 21] = [
        Partner::Sirius,
        Partner::SiriusOlymp,
        Partner::Regions,
        Partner::OlympRu,
        Partner::Fts,
        Partner::SiriusJournal,
        Partner::Gospublics,
        Partner::Ctf,
        Partner::Tap,
        Partner::SiriusCourses,
        Partner::BioCpm,
        Partner::Lingnews,
        Partner::DiplomaRu,
        Partner::Npr,
        Partner::Gosuslugi,
        Partner::Drd,
        Partner::Msu,
        Partner::SiriusTeacher,
        Partner::EduEnv,
        Partner::MinEdu,
        Partner::SchoolPartners,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partner::Sirius => "Сириус",
            Partner::SiriusOlymp => "Сириус Олимп",
            Partner::Regions => "Регионыльные центры",
            Partner::OlympRu => "Олимпиада.ру",
            Partner::Fts => "Федеральная территория Сириус",
            Partner::SiriusJournal => "Сириус Журнал",
            Partner::Gospublics => "Госпаблики",
            Partner::Ctf => "ФКР. Фонд классных руководителей",
            Partner::Tap => "Теории и практики",
            Partner::SiriusCourses => "Сириус.Курсы",
            Partner::BioCpm => "БИО ЦПМ",
            Partner::Lingnews => "Лингвовести",
            Partner::DiplomaRu => "Грамота.ру",
            Partner::Npr => "Национальные проекты России",
            Partner::Gosuslugi => "Госуслуги",
            Partner::Drd => "Департамент регионального развития",
            Partner::Msu => "МГУ",
            Partner::SiriusTeacher => "Сириус педагогам",
            Partner::EduEnv => "Образовательная среда",
            Partner::MinEdu => "Министерства просвещения",
            Partner::SchoolPartners => "Школы-партнеры Сириуса",
        }
    }

    /// Trimmed exact-match membership test, used both by row validation and
    /// by the report's partner-type re-derivation.
    pub fn is_known(value: &str) -> bool {
        let trimmed = value.trim();
        Partner::ALL.iter().any(|p| p.as_str() == trimmed)
    }
}

impl FromStr for Partner {
    type Err = BannerlinkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Partner::ALL
            .iter()
            .find(|p| p.as_str() == trimmed)
            .copied()
            .ok_or_else(|| BannerlinkerError::unknown_partner(trimmed))
    }
}
