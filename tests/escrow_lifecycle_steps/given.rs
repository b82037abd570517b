//! Given steps for escrow lifecycle BDD scenarios.

use super::world::{EscrowWorld, account, run_async};
use bountyboard::escrow::{
    domain::{Amount, Payment},
    services::CreateTaskRequest,
};
use chrono::{DateTime, Duration, Utc};
use eyre::WrapErr;
use mockable::Clock;
use rstest_bdd_macros::given;

#[given(r#"an escrow board where "{holder}" holds {amount:u64} micro units"#)]
fn funded_board(world: &mut EscrowWorld, holder: String, amount: u64) -> Result<(), eyre::Report> {
    world
        .ledger
        .fund(&account(&holder)?, Amount::new(amount))
        .wrap_err("fund scenario account")?;
    Ok(())
}

/// Creates a task for `client` that locks `amount` from the client's balance.
pub(super) fn create_task(
    world: &mut EscrowWorld,
    client: &str,
    title: &str,
    amount: u64,
    deadline: DateTime<Utc>,
) -> Result<(), eyre::Report> {
    let creator = account(client)?;
    let locked = Amount::new(amount);
    let request = CreateTaskRequest::new(title, deadline, locked).with_fund_lock(Payment::new(
        creator.clone(),
        world.service.custody_account().clone(),
        locked,
    ));
    let result = run_async(world.service.create_task(&creator, request));
    world.record(result);
    Ok(())
}

fn require_success(world: &EscrowWorld, context: &'static str) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("{context} failed: {err}")),
        None => Err(eyre::eyre!("{context} produced no result")),
    }
}

#[given(r#""{client}" has created task "{title}" locking {amount:u64} micro units due in {seconds:u64} seconds"#)]
fn task_created_due_in(
    world: &mut EscrowWorld,
    client: String,
    title: String,
    amount: u64,
    seconds: u64,
) -> Result<(), eyre::Report> {
    let offset = i64::try_from(seconds).wrap_err("deadline offset out of range")?;
    let deadline = world.clock.utc() + Duration::seconds(offset);
    create_task(world, &client, &title, amount, deadline)?;
    require_success(world, "task creation")
}

#[given(r#""{client}" has created task "{title}" locking {amount:u64} micro units due {seconds:u64} seconds ago"#)]
fn task_created_overdue(
    world: &mut EscrowWorld,
    client: String,
    title: String,
    amount: u64,
    seconds: u64,
) -> Result<(), eyre::Report> {
    let offset = i64::try_from(seconds).wrap_err("deadline offset out of range")?;
    let deadline = world.clock.utc() - Duration::seconds(offset);
    create_task(world, &client, &title, amount, deadline)?;
    require_success(world, "overdue task creation")
}

#[given(r#""{freelancer}" has claimed the task"#)]
fn task_claimed(world: &mut EscrowWorld, freelancer: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let claimant = account(&freelancer)?;
    let claimed = run_async(world.service.claim_task(&claimant, task_id))
        .wrap_err("claim task in scenario setup")?;
    world.current_task = Some(claimed);
    Ok(())
}
