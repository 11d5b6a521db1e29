use std::fmt;

use serde::{Serialize, Serializer};

/// Position in a result tree: the operation name followed by response names.
///
/// Paths are never changed in place, [`Path::append`] returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn root(operation_name: impl Into<String>) -> Self {
        Path {
            segments: vec![operation_name.into()],
        }
    }

    pub fn append(&self, response_name: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(response_name.into());

        Path { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[test]
fn append_leaves_parent_untouched() {
    let root = Path::root("GetPet");
    let pet = root.append("pet");

    assert_eq!(root.to_string(), "GetPet");
    assert_eq!(pet.to_string(), "GetPet.pet");
    assert_eq!(pet.depth(), 2);
    assert_eq!(pet.last(), "pet");
    assert!(root.is_root());
    assert_eq!(pet, Path::from_iter(["GetPet", "pet"]));
}
