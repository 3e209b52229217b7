use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::models::{Activity, Config};
use crate::seed;
use crate::store::ActivityStore;
use crate::web;

async fn open_store(cfg: &Config) -> Result<ActivityStore> {
    ActivityStore::open(&cfg.store)
        .await
        .context("Failed to open activity store")
}

pub async fn run_serve(
    mut cfg: Config,
    addr: Option<SocketAddr>,
    static_dir: Option<PathBuf>,
    in_memory: bool,
) -> Result<()> {
    if let Some(addr) = addr {
        cfg.server.addr = addr;
    }
    if let Some(dir) = static_dir {
        cfg.server.static_dir = dir;
    }
    cfg.store.in_memory |= in_memory;

    let store = open_store(&cfg).await?;
    seed::seed_if_empty(&store)
        .await
        .context("Failed to seed activity store")?;

    web::serve(Arc::new(store), &cfg.server.static_dir, cfg.server.addr).await
}

pub async fn run_seed(cfg: &Config) -> Result<()> {
    if cfg.store.in_memory {
        bail!(
            "store.in_memory is set, seeding would write nothing to disk. \
             Set [store] path and in_memory = false to seed {}",
            cfg.store.path.display()
        );
    }
    let store = open_store(cfg).await?;
    let inserted = seed::seed_if_empty(&store)
        .await
        .context("Failed to seed activity store")?;
    if inserted == 0 {
        println!("Store already holds {} activities, nothing seeded", store.count().await);
    } else {
        println!("Seeded {} activities", inserted);
    }
    Ok(())
}

fn print_activity(a: &Activity) {
    println!(
        "{} — {} ({}/{})",
        a.name,
        a.schedule,
        a.participants.len(),
        a.max_participants
    );
    println!("  {}", a.description);
    for p in &a.participants {
        println!("    - {}", p);
    }
}

pub async fn run_list(cfg: &Config, name: Option<&str>) -> Result<()> {
    let store = open_store(cfg).await?;
    if let Some(name) = name {
        let activity = store
            .find_one(name)
            .await
            .with_context(|| format!("Activity not found: {name}"))?;
        print_activity(&activity);
        return Ok(());
    }
    let activities = store.find_all().await;
    if activities.is_empty() {
        println!("No activities stored. Run `seed` or `serve` first.");
        return Ok(());
    }
    info!("Listing {} activities", activities.len());
    for a in &activities {
        print_activity(a);
    }
    Ok(())
}
