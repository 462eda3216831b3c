//! Field tags of the tagged-line export format.
//!
//! Every content line starts with one of these two-character codes. Lines
//! whose first two characters are not a known tag are continuation text.

use std::fmt;

/// Tagged-export field tags.
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum WosTag {
    /// FN - File name (header)
    FileName,
    /// VR - Format version (header)
    Version,
    /// PT - Publication type
    PublicationType,
    /// UT - Accession number
    AccessionNumber,
    /// AR - Article number
    ArticleNumber,
    /// AU - Author (abbreviated name)
    Author,
    /// AF - Author full name
    AuthorFullName,
    /// BA - Book author
    BookAuthor,
    /// BF - Book author full name
    BookAuthorFullName,
    /// BE - Editor
    Editor,
    /// CA - Group author
    GroupAuthor,
    /// GP - Book group author
    BookGroupAuthor,
    /// RI - ResearcherID
    ResearcherId,
    /// OI - ORCID identifier
    Orcid,
    /// TI - Document title
    Title,
    /// AB - Abstract
    Abstract,
    /// MA - Meeting abstract
    MeetingAbstract,
    /// SO - Publication name
    Source,
    /// J9 - 29-character source abbreviation
    SourceAbbreviation,
    /// JI - ISO source abbreviation
    IsoSourceAbbreviation,
    /// SE - Book series title
    Series,
    /// BS - Book series subtitle
    SeriesSubtitle,
    /// SN - ISSN
    Issn,
    /// EI - eISSN
    Eissn,
    /// BN - ISBN
    Isbn,
    /// PY - Publication year
    PublicationYear,
    /// PD - Publication date
    PublicationDate,
    /// VL - Volume
    Volume,
    /// IS - Issue
    Issue,
    /// SI - Special issue
    SpecialIssue,
    /// SU - Supplement
    Supplement,
    /// PN - Part number
    PartNumber,
    /// BP - Beginning page
    BeginningPage,
    /// EP - Ending page
    EndingPage,
    /// PG - Page count
    PageCount,
    /// PS - Page span
    PageSpan,
    /// DI - Digital object identifier
    Doi,
    /// D2 - Book DOI
    BookDoi,
    /// PU - Publisher
    Publisher,
    /// PI - Publisher city
    PublisherCity,
    /// PA - Publisher address
    PublisherAddress,
    /// DE - Author keywords
    AuthorKeywords,
    /// ID - Keywords Plus
    KeywordsPlus,
    /// WC - Web of Science categories
    Categories,
    /// SC - Research areas
    ResearchAreas,
    /// C1 - Author address
    Address,
    /// C3 - Affiliation
    Affiliation,
    /// RP - Reprint address
    ReprintAddress,
    /// EM - E-mail address
    Email,
    /// CT - Conference title
    ConferenceTitle,
    /// CY - Conference date
    ConferenceDate,
    /// CL - Conference location
    ConferenceLocation,
    /// HO - Conference host
    ConferenceHost,
    /// SP - Conference sponsors
    ConferenceSponsors,
    /// TA - Book title
    BookTitle,
    /// CR - Cited references
    CitedReferences,
    /// NR - Cited reference count
    CitedReferenceCount,
    /// TC - Times cited, Core Collection
    TimesCited,
    /// Z9 - Total times cited
    TotalTimesCited,
    /// U1 - Usage count, last 180 days
    UsageCount180,
    /// U2 - Usage count since 2013
    UsageCountSince2013,
    /// FU - Funding agency and grant number
    FundingAgency,
    /// FX - Funding text
    FundingText,
    /// LA - Language
    Language,
    /// DT - Document type
    DocumentType,
    /// OA - Open access indicator
    OpenAccess,
    /// PM - PubMed ID
    PubmedId,
    /// GA - Document delivery number
    DeliveryNumber,
    /// DA - Date this report was generated
    DateAdded,
    /// EA - Early access date
    EarlyAccessDate,
    /// EY - Early access year
    EarlyAccessYear,
    /// ES - ESI highly cited paper flag
    EsiHighlyCited,
    /// ET - ESI hot paper flag
    EsiHotPaper,
    /// HC - Highly cited status
    HighlyCited,
    /// HP - Hot paper status
    HotPaper,
    /// WE - Web of Science edition
    Edition,
    /// DB - Source database
    Database,
    /// GE - Gene name
    Gene,
    /// UN - Unique number
    UniqueNumber,
    /// ER - End of record
    EndOfRecord,
    /// EF - End of file
    EndOfFile,
}

impl WosTag {
    /// Look up a two-character tag code.
    ///
    /// Returns `None` for anything that is not a recognized tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = match tag {
            "FN" => WosTag::FileName,
            "VR" => WosTag::Version,
            "PT" => WosTag::PublicationType,
            "UT" => WosTag::AccessionNumber,
            "AR" => WosTag::ArticleNumber,
            "AU" => WosTag::Author,
            "AF" => WosTag::AuthorFullName,
            "BA" => WosTag::BookAuthor,
            "BF" => WosTag::BookAuthorFullName,
            "BE" => WosTag::Editor,
            "CA" => WosTag::GroupAuthor,
            "GP" => WosTag::BookGroupAuthor,
            "RI" => WosTag::ResearcherId,
            "OI" => WosTag::Orcid,
            "TI" => WosTag::Title,
            "AB" => WosTag::Abstract,
            "MA" => WosTag::MeetingAbstract,
            "SO" => WosTag::Source,
            "J9" => WosTag::SourceAbbreviation,
            "JI" => WosTag::IsoSourceAbbreviation,
            "SE" => WosTag::Series,
            "BS" => WosTag::SeriesSubtitle,
            "SN" => WosTag::Issn,
            "EI" => WosTag::Eissn,
            "BN" => WosTag::Isbn,
            "PY" => WosTag::PublicationYear,
            "PD" => WosTag::PublicationDate,
            "VL" => WosTag::Volume,
            "IS" => WosTag::Issue,
            "SI" => WosTag::SpecialIssue,
            "SU" => WosTag::Supplement,
            "PN" => WosTag::PartNumber,
            "BP" => WosTag::BeginningPage,
            "EP" => WosTag::EndingPage,
            "PG" => WosTag::PageCount,
            "PS" => WosTag::PageSpan,
            "DI" => WosTag::Doi,
            "D2" => WosTag::BookDoi,
            "PU" => WosTag::Publisher,
            "PI" => WosTag::PublisherCity,
            "PA" => WosTag::PublisherAddress,
            "DE" => WosTag::AuthorKeywords,
            "ID" => WosTag::KeywordsPlus,
            "WC" => WosTag::Categories,
            "SC" => WosTag::ResearchAreas,
            "C1" => WosTag::Address,
            "C3" => WosTag::Affiliation,
            "RP" => WosTag::ReprintAddress,
            "EM" => WosTag::Email,
            "CT" => WosTag::ConferenceTitle,
            "CY" => WosTag::ConferenceDate,
            "CL" => WosTag::ConferenceLocation,
            "HO" => WosTag::ConferenceHost,
            "SP" => WosTag::ConferenceSponsors,
            "TA" => WosTag::BookTitle,
            "CR" => WosTag::CitedReferences,
            "NR" => WosTag::CitedReferenceCount,
            "TC" => WosTag::TimesCited,
            "Z9" => WosTag::TotalTimesCited,
            "U1" => WosTag::UsageCount180,
            "U2" => WosTag::UsageCountSince2013,
            "FU" => WosTag::FundingAgency,
            "FX" => WosTag::FundingText,
            "LA" => WosTag::Language,
            "DT" => WosTag::DocumentType,
            "OA" => WosTag::OpenAccess,
            "PM" => WosTag::PubmedId,
            "GA" => WosTag::DeliveryNumber,
            "DA" => WosTag::DateAdded,
            "EA" => WosTag::EarlyAccessDate,
            "EY" => WosTag::EarlyAccessYear,
            "ES" => WosTag::EsiHighlyCited,
            "ET" => WosTag::EsiHotPaper,
            "HC" => WosTag::HighlyCited,
            "HP" => WosTag::HotPaper,
            "WE" => WosTag::Edition,
            "DB" => WosTag::Database,
            "GE" => WosTag::Gene,
            "UN" => WosTag::UniqueNumber,
            "ER" => WosTag::EndOfRecord,
            "EF" => WosTag::EndOfFile,
            _ => return None,
        };
        Some(tag)
    }

    /// The two-character code of this tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            WosTag::FileName => "FN",
            WosTag::Version => "VR",
            WosTag::PublicationType => "PT",
            WosTag::AccessionNumber => "UT",
            WosTag::ArticleNumber => "AR",
            WosTag::Author => "AU",
            WosTag::AuthorFullName => "AF",
            WosTag::BookAuthor => "BA",
            WosTag::BookAuthorFullName => "BF",
            WosTag::Editor => "BE",
            WosTag::GroupAuthor => "CA",
            WosTag::BookGroupAuthor => "GP",
            WosTag::ResearcherId => "RI",
            WosTag::Orcid => "OI",
            WosTag::Title => "TI",
            WosTag::Abstract => "AB",
            WosTag::MeetingAbstract => "MA",
            WosTag::Source => "SO",
            WosTag::SourceAbbreviation => "J9",
            WosTag::IsoSourceAbbreviation => "JI",
            WosTag::Series => "SE",
            WosTag::SeriesSubtitle => "BS",
            WosTag::Issn => "SN",
            WosTag::Eissn => "EI",
            WosTag::Isbn => "BN",
            WosTag::PublicationYear => "PY",
            WosTag::PublicationDate => "PD",
            WosTag::Volume => "VL",
            WosTag::Issue => "IS",
            WosTag::SpecialIssue => "SI",
            WosTag::Supplement => "SU",
            WosTag::PartNumber => "PN",
            WosTag::BeginningPage => "BP",
            WosTag::EndingPage => "EP",
            WosTag::PageCount => "PG",
            WosTag::PageSpan => "PS",
            WosTag::Doi => "DI",
            WosTag::BookDoi => "D2",
            WosTag::Publisher => "PU",
            WosTag::PublisherCity => "PI",
            WosTag::PublisherAddress => "PA",
            WosTag::AuthorKeywords => "DE",
            WosTag::KeywordsPlus => "ID",
            WosTag::Categories => "WC",
            WosTag::ResearchAreas => "SC",
            WosTag::Address => "C1",
            WosTag::Affiliation => "C3",
            WosTag::ReprintAddress => "RP",
            WosTag::Email => "EM",
            WosTag::ConferenceTitle => "CT",
            WosTag::ConferenceDate => "CY",
            WosTag::ConferenceLocation => "CL",
            WosTag::ConferenceHost => "HO",
            WosTag::ConferenceSponsors => "SP",
            WosTag::BookTitle => "TA",
            WosTag::CitedReferences => "CR",
            WosTag::CitedReferenceCount => "NR",
            WosTag::TimesCited => "TC",
            WosTag::TotalTimesCited => "Z9",
            WosTag::UsageCount180 => "U1",
            WosTag::UsageCountSince2013 => "U2",
            WosTag::FundingAgency => "FU",
            WosTag::FundingText => "FX",
            WosTag::Language => "LA",
            WosTag::DocumentType => "DT",
            WosTag::OpenAccess => "OA",
            WosTag::PubmedId => "PM",
            WosTag::DeliveryNumber => "GA",
            WosTag::DateAdded => "DA",
            WosTag::EarlyAccessDate => "EA",
            WosTag::EarlyAccessYear => "EY",
            WosTag::EsiHighlyCited => "ES",
            WosTag::EsiHotPaper => "ET",
            WosTag::HighlyCited => "HC",
            WosTag::HotPaper => "HP",
            WosTag::Edition => "WE",
            WosTag::Database => "DB",
            WosTag::Gene => "GE",
            WosTag::UniqueNumber => "UN",
            WosTag::EndOfRecord => "ER",
            WosTag::EndOfFile => "EF",
        }
    }

    /// Tags whose lines each hold one separate value.
    pub fn is_list_tag(&self) -> bool {
        matches!(
            self,
            WosTag::Author
                | WosTag::AuthorFullName
                | WosTag::BookAuthor
                | WosTag::BookAuthorFullName
                | WosTag::Editor
                | WosTag::CitedReferences
        )
    }

    /// File-level header tags that never belong to a record.
    pub fn is_header_tag(&self) -> bool {
        matches!(self, WosTag::FileName | WosTag::Version)
    }
}

impl fmt::Display for WosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("AU", Some(WosTag::Author))]
    #[case("C1", Some(WosTag::Address))]
    #[case("Z9", Some(WosTag::TotalTimesCited))]
    #[case("ER", Some(WosTag::EndOfRecord))]
    #[case("XX", None)]
    #[case("au", None)]
    #[case("", None)]
    fn test_from_tag(#[case] input: &str, #[case] expected: Option<WosTag>) {
        assert_eq!(WosTag::from_tag(input), expected);
    }

    #[test]
    fn test_round_trip_codes() {
        for code in ["FN", "VR", "PT", "AU", "AF", "TI", "SO", "PY", "TC", "CR", "DE", "ID", "EF"] {
            let tag = WosTag::from_tag(code).unwrap();
            assert_eq!(tag.as_tag(), code);
        }
    }

    #[rstest]
    #[case(WosTag::Author, true)]
    #[case(WosTag::CitedReferences, true)]
    #[case(WosTag::Title, false)]
    #[case(WosTag::Address, false)]
    fn test_is_list_tag(#[case] tag: WosTag, #[case] expected: bool) {
        assert_eq!(tag.is_list_tag(), expected);
    }
}
