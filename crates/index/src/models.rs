use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The kind of file an index entry was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Packaged Java archive.
    Jar,
    /// Packaged Android archive.
    Aar,
    Pom,
    Sources,
    Javadoc,
}
impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jar => "jar",
            Self::Aar => "aar",
            Self::Pom => "pom",
            Self::Sources => "sources",
            Self::Javadoc => "javadoc",
        }
    }
}
impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
impl FromStr for FileType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "jar" => Self::Jar,
            "aar" => Self::Aar,
            "pom" => Self::Pom,
            "sources" => Self::Sources,
            "javadoc" => Self::Javadoc,
            _ => exn::bail!(ErrorKind::InvalidData("file type")),
        })
    }
}

/// One indexed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Lowercase hex SHA-1 of the file.
    pub sha1: String,
    pub file_type: FileType,
}
impl IndexEntry {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        sha1: impl Into<String>,
        file_type: FileType,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            sha1: sha1.into(),
            file_type,
        }
    }
}

/// A fully-qualified package coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}
impl From<IndexEntry> for Coordinate {
    fn from(entry: IndexEntry) -> Self {
        Self { group_id: entry.group_id, artifact_id: entry.artifact_id, version: entry.version }
    }
}
impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct IndexRow {
    group_id: String,
    artifact_id: String,
    version: String,
    sha1: String,
    file_type: String,
}
impl TryFrom<IndexRow> for IndexEntry {
    type Error = Error;
    fn try_from(row: IndexRow) -> Result<Self, Self::Error> {
        Ok(Self {
            group_id: row.group_id,
            artifact_id: row.artifact_id,
            version: row.version,
            sha1: row.sha1,
            file_type: row.file_type.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jar", FileType::Jar)]
    #[case("JAR", FileType::Jar)]
    #[case("aar", FileType::Aar)]
    #[case("pom", FileType::Pom)]
    #[case("sources", FileType::Sources)]
    #[case("javadoc", FileType::Javadoc)]
    fn test_file_type_parse(#[case] input: &str, #[case] expected: FileType) {
        assert_eq!(input.parse::<FileType>().unwrap(), expected);
    }

    #[test]
    fn test_file_type_invalid() {
        let err = "war".parse::<FileType>().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("file type"));
    }

    #[test]
    fn test_row_to_model() {
        let row = IndexRow {
            group_id: "javax.servlet".to_string(),
            artifact_id: "jstl".to_string(),
            version: "1.2".to_string(),
            sha1: "74aca283cd4f4b4f3e425f5820cda58f44409547".to_string(),
            file_type: "jar".to_string(),
        };
        let entry = IndexEntry::try_from(row).unwrap();
        assert_eq!(entry.file_type, FileType::Jar);
        assert_eq!(Coordinate::from(entry).to_string(), "javax.servlet:jstl:1.2");
    }
}
