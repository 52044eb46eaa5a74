use anyhow::Context;
use blockchain::{connect_chain, query_chain_id};
use crypto::SigningKey;
use env_logger::Env;
use envconfig::Envconfig;
use log::info;

use crate::{
    artifacts::Artifacts,
    avs,
    chain::ProviderChain,
    config::{DeployerEnv, DeployerParams},
    orchestrator::Orchestrator,
};

fn load_config() -> anyhow::Result<DeployerEnv> {
    dotenv::dotenv()
        .map_err(|err| {
            eprintln!(".env file error: {err}");
            err
        })
        .ok();

    DeployerEnv::init_from_env().context("Failed to load deployer config")
}

/// Provisions the AVS contracts and writes the deployment manifests.
pub async fn run() -> anyhow::Result<()> {
    let env = load_config()?;
    env_logger::Builder::from_env(Env::default().default_filter_or(env.log_level.as_str())).init();

    let params = DeployerParams::load(&env.params_file)?;
    let core = manifest::load_eigenlayer_core(&env.eigenlayer_deployment)
        .context("Failed to load EigenLayer deployment")?;
    let key = SigningKey::parse(env.private_key.expose())?;

    let plan = avs::aligned_layer_plan(&params);
    let artifacts = Artifacts::load(&env.artifacts_dir, plan.artifact_names())
        .context("Failed to load contract artifacts")?;

    let client = connect_chain(&env.rpc_url).await?;
    let chain_id = query_chain_id(&client).await?;
    let identity = key.bind(chain_id);
    info!(
        "Provisioning on chain {chain_id} as {}",
        identity.address()
    );

    let roles = params.roles.resolve(identity.address());
    let external = avs::external_addresses(&core, &roles);
    let chain = ProviderChain::connect(&client, &identity).await?;

    let system = Orchestrator::new(&chain, &artifacts)
        .run(&plan, external)
        .await
        .context("Provisioning failed")?;

    let (service, shared) = avs::write_outputs(&env.output_dir, &system, &core)?;
    info!(
        "Deployment manifests written to {} and {}",
        service.display(),
        shared.display()
    );
    Ok(())
}
