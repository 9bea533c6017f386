use serde::{Deserialize, Deserializer, Serialize};

/// Missing fields, and `null` for nested values, decode as the zero value.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub configuration_git_path: String,
    pub project_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub environments: Vec<Environment>,
    /// Default value means no pipeline is configured.
    #[serde(deserialize_with = "null_as_default")]
    pub pipelines: Pipelines,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Environment {
    #[serde(rename = "value")]
    pub env_id: String,
    #[serde(rename = "label")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster: Cluster,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Cluster {
    pub hostname: String,
    pub namespace: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipelines {
    #[serde(rename = "type", default)]
    pub pipeline_type: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Pipelines {
    pub fn is_configured(&self) -> bool {
        !self.pipeline_type.is_empty()
    }
}
