use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::{Sample, Submittable};

/// A pointer from one submittable to another, by accession or by alias within a team.
pub trait Reference {
    fn alias(&self) -> Option<&str>;
    fn accession(&self) -> Option<&str>;
    fn team(&self) -> Option<&str>;

    /// An accession on both sides wins. Otherwise alias and team must both agree.
    fn is_match(&self, target: &impl Submittable) -> bool {
        if let (Some(accession), Some(target_accession)) = (self.accession(), target.accession()) {
            return accession == target_accession;
        }

        match (self.alias(), target.alias()) {
            (Some(alias), Some(target_alias)) => {
                alias == target_alias && self.team() == target.team()
            }
            _ => false,
        }
    }
}

macro_rules! plain_reference {
    ($($name:ident),*) => {
        $(
            #[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
            #[serde(rename_all = "camelCase")]
            pub struct $name {
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub alias: Option<String>,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub accession: Option<String>,
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub team: Option<String>,
            }

            impl Reference for $name {
                fn alias(&self) -> Option<&str> {
                    self.alias.as_deref()
                }

                fn accession(&self) -> Option<&str> {
                    self.accession.as_deref()
                }

                fn team(&self) -> Option<&str> {
                    self.team.as_deref()
                }
            }
        )*
    };
}

plain_reference!(StudyRef, AssayRef);

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_object: Option<Sample>,
}

impl Reference for SampleRef {
    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn accession(&self) -> Option<&str> {
        self.accession.as_deref()
    }

    fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

impl SampleRef {
    /// Looks through each pool in turn and attaches the first matching sample. Whatever was attached before is
    /// discarded, so the reference is resolved only if one of `pools` holds a match.
    pub fn fill_in<'a>(&mut self, pools: impl IntoIterator<Item = &'a [Sample]>) -> bool {
        let found = pools
            .into_iter()
            .find_map(|pool| pool.iter().find(|sample| self.is_match(*sample)));

        self.referenced_object = found.cloned();

        self.is_resolved()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.referenced_object.is_some()
    }
}

impl Display for SampleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            alias,
            accession,
            team,
            ..
        } = self;

        write!(
            f,
            "sample reference (accession = {}, alias = {}, team = {})",
            accession.as_deref().unwrap_or("none"),
            alias.as_deref().unwrap_or("none"),
            team.as_deref().unwrap_or("none")
        )
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleUse {
    pub sample_ref: SampleRef,
}
