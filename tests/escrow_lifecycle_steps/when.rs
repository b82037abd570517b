//! When steps for escrow lifecycle BDD scenarios.

use super::given::create_task;
use super::world::{EscrowWorld, account, run_async};
use chrono::Duration;
use eyre::WrapErr;
use mockable::Clock;
use rstest_bdd_macros::when;

#[when(r#""{client}" creates task "{title}" locking {amount:u64} micro units due in {seconds:u64} seconds"#)]
fn creates_task(
    world: &mut EscrowWorld,
    client: String,
    title: String,
    amount: u64,
    seconds: u64,
) -> Result<(), eyre::Report> {
    let offset = i64::try_from(seconds).wrap_err("deadline offset out of range")?;
    let deadline = world.clock.utc() + Duration::seconds(offset);
    create_task(world, &client, &title, amount, deadline)
}

#[when(r#""{caller}" claims the task"#)]
fn claims_task(world: &mut EscrowWorld, caller: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.service.claim_task(&account(&caller)?, task_id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" submits proof "{proof}""#)]
fn submits_proof(
    world: &mut EscrowWorld,
    caller: String,
    proof: String,
) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.service.submit_work(&account(&caller)?, task_id, proof));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" approves the task"#)]
fn approves_task(world: &mut EscrowWorld, caller: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.service.approve_task(&account(&caller)?, task_id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" rejects the task"#)]
fn rejects_task(world: &mut EscrowWorld, caller: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.service.reject_task(&account(&caller)?, task_id));
    world.record(result);
    Ok(())
}

#[when(r#""{caller}" refunds the task"#)]
fn refunds_task(world: &mut EscrowWorld, caller: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.service.refund_task(&account(&caller)?, task_id));
    world.record(result);
    Ok(())
}
