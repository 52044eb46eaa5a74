//! Declarative description of what gets provisioned.
//!
//! Every address a step needs is referenced by name. Names resolve against
//! the external book (pre-existing contracts and role accounts), the reserved
//! proxy admin / empty contract, the component proxies reserved in phase A and
//! auxiliary deployments made earlier in phase B.
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

use alloy::primitives::{Address, Bytes};

use crate::error::PlanError;

pub const PROXY_ADMIN: &str = "proxyAdmin";
pub const EMPTY_CONTRACT: &str = "emptyContract";

pub const PROXY_ADMIN_ARTIFACT: &str = "ProxyAdmin";
pub const EMPTY_CONTRACT_ARTIFACT: &str = "EmptyContract";
pub const PROXY_ARTIFACT: &str = "TransparentUpgradeableProxy";

/// Turns resolved addresses (in the order they were named) into ABI bytes.
pub type Encoder = Arc<dyn Fn(&[Address]) -> Bytes + Send + Sync>;

fn no_args() -> Encoder {
    Arc::new(|_| Bytes::new())
}

pub fn implementation_name(name: &str) -> String {
    format!("{name}Implementation")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook(BTreeMap<String, Address>);

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, address: Address) {
        self.0.insert(name.into(), address);
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.0.iter().map(|(name, address)| (name.as_str(), *address))
    }

    pub fn resolve(&self, owner: &str, names: &[String]) -> Result<Vec<Address>, PlanError> {
        names
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| PlanError::UnknownDependency {
                    owner: owner.to_string(),
                    dependency: name.clone(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, Address)> for AddressBook {
    fn from_iter<T: IntoIterator<Item = (String, Address)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Clone)]
pub struct Call {
    pub args: Vec<String>,
    pub encode: Encoder,
}

impl Call {
    fn new<F>(args: &[&str], encode: F) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
            encode: Arc::new(encode),
        }
    }

    fn empty() -> Self {
        Self {
            args: Vec::new(),
            encode: no_args(),
        }
    }

    pub fn encode(&self, addresses: &[Address]) -> Bytes {
        (self.encode)(addresses)
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call").field("args", &self.args).finish()
    }
}

/// An upgradeable component: proxy reserved in phase A, implementation
/// deployed in phase C, bound (and optionally initialized) in phase D.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub name: String,
    pub artifact: String,
    pub constructor: Call,
    pub initializer: Option<Call>,
    pub initialize_after: Vec<String>,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
            constructor: Call::empty(),
            initializer: None,
            initialize_after: Vec::new(),
        }
    }

    pub fn constructor<F>(mut self, args: &[&str], encode: F) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        self.constructor = Call::new(args, encode);
        self
    }

    pub fn initializer<F>(mut self, args: &[&str], encode: F) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        self.initializer = Some(Call::new(args, encode));
        self
    }

    /// Components whose upgrade must complete before this one's.
    pub fn after(mut self, names: &[&str]) -> Self {
        self.initialize_after
            .extend(names.iter().map(|n| n.to_string()));
        self
    }
}

/// Non-upgradeable work done between proxy reservation and implementations.
#[derive(Debug, Clone)]
pub enum AuxStep {
    Deploy {
        name: String,
        artifact: String,
        constructor: Call,
    },
    /// Implementation plus a proxy created already pointing at it, with
    /// the initializer passed as proxy constructor data.
    DeployBehindProxy {
        name: String,
        artifact: String,
        constructor: Call,
        initializer: Call,
    },
    Call {
        label: String,
        target: String,
        call: Call,
    },
}

impl AuxStep {
    pub fn deploy<F>(name: &str, artifact: &str, args: &[&str], encode: F) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        AuxStep::Deploy {
            name: name.to_string(),
            artifact: artifact.to_string(),
            constructor: Call::new(args, encode),
        }
    }

    pub fn deploy_plain(name: &str, artifact: &str) -> Self {
        AuxStep::Deploy {
            name: name.to_string(),
            artifact: artifact.to_string(),
            constructor: Call::empty(),
        }
    }

    pub fn deploy_behind_proxy<F, G>(
        name: &str,
        artifact: &str,
        args: &[&str],
        encode: F,
        init_args: &[&str],
        init_encode: G,
    ) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
        G: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        AuxStep::DeployBehindProxy {
            name: name.to_string(),
            artifact: artifact.to_string(),
            constructor: Call::new(args, encode),
            initializer: Call::new(init_args, init_encode),
        }
    }

    pub fn call<F>(label: &str, target: &str, args: &[&str], encode: F) -> Self
    where
        F: Fn(&[Address]) -> Bytes + Send + Sync + 'static,
    {
        AuxStep::Call {
            label: label.to_string(),
            target: target.to_string(),
            call: Call::new(args, encode),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AuxStep::Deploy { name, .. } | AuxStep::DeployBehindProxy { name, .. } => name,
            AuxStep::Call { label, .. } => label,
        }
    }

    fn artifact(&self) -> Option<&str> {
        match self {
            AuxStep::Deploy { artifact, .. } | AuxStep::DeployBehindProxy { artifact, .. } => {
                Some(artifact)
            }
            AuxStep::Call { .. } => None,
        }
    }

    /// Names this step adds to the address book.
    fn defines(&self) -> Vec<String> {
        match self {
            AuxStep::Deploy { name, .. } => vec![name.clone()],
            AuxStep::DeployBehindProxy { name, .. } => {
                vec![implementation_name(name), name.clone()]
            }
            AuxStep::Call { .. } => Vec::new(),
        }
    }

    /// Names this step reads from the address book.
    fn references(&self) -> Vec<&String> {
        match self {
            AuxStep::Deploy { constructor, .. } => constructor.args.iter().collect(),
            AuxStep::DeployBehindProxy {
                constructor,
                initializer,
                ..
            } => constructor.args.iter().chain(&initializer.args).collect(),
            AuxStep::Call { target, call, .. } => {
                std::iter::once(target).chain(&call.args).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProvisioningPlan {
    pub components: Vec<ComponentSpec>,
    pub auxiliary: Vec<AuxStep>,
}

impl ProvisioningPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    pub fn auxiliary(mut self, step: AuxStep) -> Self {
        self.auxiliary.push(step);
        self
    }

    /// Every artifact any phase will need.
    pub fn artifact_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = [PROXY_ADMIN_ARTIFACT, EMPTY_CONTRACT_ARTIFACT, PROXY_ARTIFACT]
            .into_iter()
            .map(String::from)
            .collect();
        names.extend(self.components.iter().map(|c| c.artifact.clone()));
        names.extend(
            self.auxiliary
                .iter()
                .filter_map(AuxStep::artifact)
                .map(String::from),
        );
        names
    }

    /// Checks every reference against what will exist when it is needed and
    /// returns the phase D order as indices into `components`.
    pub fn validate(&self, external: &AddressBook) -> Result<Vec<usize>, PlanError> {
        let mut known: BTreeSet<String> = external.iter().map(|(n, _)| n.to_string()).collect();

        declare(PROXY_ADMIN, &mut known)?;
        declare(EMPTY_CONTRACT, &mut known)?;
        for component in &self.components {
            declare(&component.name, &mut known)?;
        }

        // Phase B is sequential: a step sees only what precedes it.
        for step in &self.auxiliary {
            check_known(step.label(), step.references(), &known)?;
            for name in step.defines() {
                declare(&name, &mut known)?;
            }
        }

        // Phase C and D run after every auxiliary step.
        for component in &self.components {
            check_known(&component.name, component.constructor.args.iter(), &known)?;
            if let Some(init) = &component.initializer {
                check_known(&component.name, init.args.iter(), &known)?;
            }
        }

        self.initialization_order()
    }

    fn initialization_order(&self) -> Result<Vec<usize>, PlanError> {
        let index: BTreeMap<&str, usize> = self
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        let mut deps: Vec<BTreeSet<usize>> = Vec::with_capacity(self.components.len());
        for (i, component) in self.components.iter().enumerate() {
            let mut edges = BTreeSet::new();
            for name in &component.initialize_after {
                let &dep = index.get(name.as_str()).ok_or_else(|| PlanError::NotAComponent {
                    owner: component.name.clone(),
                    dependency: name.clone(),
                })?;
                edges.insert(dep);
            }
            // Initializing with another component's address needs that
            // component to be live first.
            if let Some(init) = &component.initializer {
                edges.extend(init.args.iter().filter_map(|a| index.get(a.as_str()).copied()));
            }
            edges.remove(&i);
            deps.push(edges);
        }

        // Kahn's algorithm, ties broken by declaration order.
        let mut order = Vec::with_capacity(self.components.len());
        let mut done = vec![false; self.components.len()];
        while order.len() < self.components.len() {
            let next = (0..self.components.len())
                .find(|&i| !done[i] && deps[i].iter().all(|&d| done[d]));
            match next {
                Some(i) => {
                    done[i] = true;
                    order.push(i);
                }
                None => {
                    let stuck = (0..self.components.len())
                        .find(|&i| !done[i])
                        .map(|i| self.components[i].name.clone())
                        .unwrap_or_default();
                    return Err(PlanError::InitializationCycle(stuck));
                }
            }
        }
        Ok(order)
    }
}

fn declare(name: &str, known: &mut BTreeSet<String>) -> Result<(), PlanError> {
    if known.insert(name.to_string()) {
        Ok(())
    } else {
        Err(PlanError::DuplicateName(name.to_string()))
    }
}

fn check_known<'a>(
    owner: &str,
    names: impl IntoIterator<Item = &'a String>,
    known: &BTreeSet<String>,
) -> Result<(), PlanError> {
    for name in names {
        if !known.contains(name) {
            return Err(PlanError::UnknownDependency {
                owner: owner.to_string(),
                dependency: name.clone(),
            });
        }
    }
    Ok(())
}
