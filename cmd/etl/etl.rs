mod cli;
mod error;
mod rpc;
mod store;

use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, filter::Directive};

use golembase_wal::{iterator::WalIterator, writer::clean_temp_files};

use crate::{
    cli::Options,
    error::EtlError,
    rpc::EthClient,
    store::{MirrorStore, ProcessingStatus},
};

/// Outer deadline for replaying one block: operation iteration plus the
/// mirror transaction commit.
const BLOCK_DEADLINE: Duration = Duration::from_secs(30);

fn init_tracing(opts: &Options) {
    let log_filter = EnvFilter::builder()
        .with_default_directive(Directive::from(opts.log_level))
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(log_filter).init();
}

async fn run(opts: Options, cancel: CancellationToken) -> Result<(), EtlError> {
    let store = MirrorStore::new(&opts.db_file).await?;

    let rpc = EthClient::new(&opts.rpc_endpoint);
    let network = rpc.get_chain_id().await?.to_string();

    if !store.has_processing_status(&network).await? {
        info!(network, "no processing status found, inserting genesis block");
        let genesis_hash = rpc.get_block_hash_by_number(0).await?;
        store
            .insert_processing_status(ProcessingStatus {
                network: network.clone(),
                last_processed_block_number: 0,
                last_processed_block_hash: genesis_hash,
            })
            .await?;
    }

    let status = store.get_processing_status(&network).await?;
    info!(
        network,
        block = status.last_processed_block_number,
        "resuming from processing status"
    );

    // interrupted writer runs may have left half-written files behind
    clean_temp_files(&opts.wal_dir)?;

    let mut iterator = WalIterator::new(
        &opts.wal_dir,
        status.last_processed_block_number + 1,
        status.last_processed_block_hash,
        true,
        cancel.clone(),
    );

    while let Some(mut wal_block) = iterator.next_block().await? {
        let number = wal_block.info().number;
        info!(block = number, "processing block");

        tokio::time::timeout(BLOCK_DEADLINE, store.apply_block(&network, &mut wal_block))
            .await
            .map_err(|_| EtlError::BlockDeadlineExceeded(number))??;
    }

    info!("wal iteration finished, shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    let opts = Options::parse();
    init_tracing(&opts);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
                cancel.cancel();
            }
        });
    }

    if let Err(err) = run(opts, cancel).await {
        error!(error = %err, "etl failed");
        std::process::exit(1);
    }
}
