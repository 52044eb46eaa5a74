//! Creation bytecode read from forge build output
//! (`<dir>/<Name>.sol/<Name>.json`).
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use log::debug;
use serde::Deserialize;

use crate::error::ArtifactError;

#[derive(Deserialize)]
struct ForgeArtifact {
    bytecode: ForgeBytecode,
}

#[derive(Deserialize)]
struct ForgeBytecode {
    object: String,
}

#[derive(Debug, Clone)]
pub struct ContractArtifact {
    name: String,
    bytecode: Bytes,
}

impl ContractArtifact {
    pub fn new(name: impl Into<String>, bytecode: Bytes) -> Self {
        Self {
            name: name.into(),
            bytecode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Artifacts(BTreeMap<String, ContractArtifact>);

impl Artifacts {
    pub fn artifact_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.sol")).join(format!("{name}.json"))
    }

    pub fn load<I, S>(dir: &Path, names: I) -> Result<Self, ArtifactError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let artifact = Self::load_one(dir, name)?;
            loaded.insert(name.to_string(), artifact);
        }
        Ok(Self(loaded))
    }

    fn load_one(dir: &Path, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let path = Self::artifact_path(dir, name);
        let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed: ForgeArtifact =
            serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
                path: path.clone(),
                source,
            })?;

        let bytecode = parsed.bytecode.object.parse::<Bytes>().map_err(|e| {
            ArtifactError::InvalidBytecode {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        if bytecode.is_empty() {
            return Err(ArtifactError::InvalidBytecode {
                name: name.to_string(),
                reason: "empty bytecode (abstract contract or interface?)".into(),
            });
        }

        debug!("Loaded artifact {name} ({} bytes)", bytecode.len());
        Ok(ContractArtifact::new(name, bytecode))
    }

    pub fn insert(&mut self, artifact: ContractArtifact) {
        self.0.insert(artifact.name.clone(), artifact);
    }

    pub fn get(&self, name: &str) -> Result<&ContractArtifact, ArtifactError> {
        self.0
            .get(name)
            .ok_or_else(|| ArtifactError::Unknown(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl FromIterator<ContractArtifact> for Artifacts {
    fn from_iter<T: IntoIterator<Item = ContractArtifact>>(iter: T) -> Self {
        let mut artifacts = Self::default();
        for artifact in iter {
            artifacts.insert(artifact);
        }
        artifacts
    }
}
