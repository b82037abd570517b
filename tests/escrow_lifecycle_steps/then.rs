//! Then steps for escrow lifecycle BDD scenarios.

use super::world::{EscrowWorld, account, run_async};
use bountyboard::escrow::domain::{Amount, Task, TaskId, TaskStatus};
use rstest_bdd_macros::then;

fn current_task(world: &EscrowWorld) -> Result<&Task, eyre::Report> {
    world
        .current_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing current task"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &EscrowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = current_task(world)?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then("the task id is {task_id:u64}")]
fn task_id_is(world: &EscrowWorld, task_id: u64) -> Result<(), eyre::Report> {
    let task = current_task(world)?;
    eyre::ensure!(task.id() == TaskId::new(task_id), "unexpected task id {}", task.id());
    Ok(())
}

#[then(r#"the task freelancer is "{freelancer}""#)]
fn task_freelancer_is(world: &EscrowWorld, freelancer: String) -> Result<(), eyre::Report> {
    let expected = account(&freelancer)?;
    let task = current_task(world)?;
    eyre::ensure!(
        task.freelancer() == Some(&expected),
        "expected freelancer {expected}, found {:?}",
        task.freelancer()
    );
    Ok(())
}

#[then(r#"the task proof is "{proof}""#)]
fn task_proof_is(world: &EscrowWorld, proof: String) -> Result<(), eyre::Report> {
    let task = current_task(world)?;
    let found = task.proof().map(|value| value.as_str());
    eyre::ensure!(found == Some(proof.as_str()), "expected proof {proof:?}, found {found:?}");
    Ok(())
}

#[then("the task has no proof")]
fn task_has_no_proof(world: &EscrowWorld) -> Result<(), eyre::Report> {
    let task = current_task(world)?;
    eyre::ensure!(task.proof().is_none(), "proof should have been cleared");
    Ok(())
}

#[then("the custody balance is {amount:u64} micro units")]
fn custody_balance_is(world: &EscrowWorld, amount: u64) -> Result<(), eyre::Report> {
    let balance = run_async(world.service.custody_balance())?;
    eyre::ensure!(
        balance == Amount::new(amount),
        "expected custody balance {amount}, found {balance}"
    );
    Ok(())
}

#[then(r#""{holder}" holds {amount:u64} micro units"#)]
fn account_holds(world: &EscrowWorld, holder: String, amount: u64) -> Result<(), eyre::Report> {
    let balance = run_async(world.service.balance(&account(&holder)?))?;
    eyre::ensure!(
        balance == Amount::new(amount),
        "expected {holder} to hold {amount}, found {balance}"
    );
    Ok(())
}

#[then("the next task id is {task_id:u64}")]
fn next_task_id_is(world: &EscrowWorld, task_id: u64) -> Result<(), eyre::Report> {
    let next = run_async(world.service.next_task_id())?;
    eyre::ensure!(next == TaskId::new(task_id), "unexpected next task id {next}");
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails_with(world: &EscrowWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {kind} failure, got {} ({err})", err.kind())),
        Ok(task) => Err(eyre::eyre!("expected {kind} failure, got task {}", task.id())),
    }
}
