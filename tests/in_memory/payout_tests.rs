//! Exactly-once payout tests under concurrent and replayed requests.

use std::sync::Arc;

use bountyboard::escrow::{
    domain::{AccountId, Amount, Payment, TaskId, TaskStatus},
    services::{CreateTaskRequest, EscrowErrorKind},
};
use chrono::Duration;
use rstest::rstest;

use super::helpers::{Board, CLIENT_FUNDS, LOCKED, board, epoch};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_release_the_escrow_once(board: Board) -> eyre::Result<()> {
    let task_id = board.submitted("T1").await?;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&board.service);
            let client = board.client.clone();
            tokio::spawn(async move { service.approve_task(&client, task_id).await })
        })
        .collect();

    let mut approvals = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(task) => {
                eyre::ensure!(task.status() == TaskStatus::Approved);
                approvals += 1;
            }
            Err(err) => {
                eyre::ensure!(
                    err.kind() == EscrowErrorKind::InvalidState,
                    "losing approval failed with {err}"
                );
            }
        }
    }

    eyre::ensure!(approvals == 1, "expected one winning approval, got {approvals}");
    eyre::ensure!(board.service.balance(&board.freelancer).await? == LOCKED);
    eyre::ensure!(board.service.custody_balance().await? == Amount::ZERO);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_refund_and_submit_settle_once(board: Board) -> eyre::Result<()> {
    let task_id = board.post("T1", Duration::hours(1)).await?.id();
    board.service.claim_task(&board.freelancer, task_id).await?;

    let refund = {
        let service = Arc::clone(&board.service);
        let client = board.client.clone();
        tokio::spawn(async move { service.refund_task(&client, task_id).await })
    };
    let submit = {
        let service = Arc::clone(&board.service);
        let freelancer = board.freelancer.clone();
        tokio::spawn(async move { service.submit_work(&freelancer, task_id, "hash123").await })
    };
    let refunded = refund.await?.is_ok();
    let submitted = submit.await?.is_ok();

    let settled = board.service.get_task(task_id).await?;
    let client_balance = board.service.balance(&board.client).await?;
    let custody = board.service.custody_balance().await?;
    match (refunded, submitted) {
        (true, false) => {
            eyre::ensure!(settled.status() == TaskStatus::Refunded);
            eyre::ensure!(client_balance == CLIENT_FUNDS);
            eyre::ensure!(custody == Amount::ZERO);
        }
        (false, true) => {
            eyre::ensure!(settled.status() == TaskStatus::Submitted);
            eyre::ensure!(custody == LOCKED);
        }
        other => eyre::bail!("exactly one of refund and submit must win, got {other:?}"),
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custody_always_equals_the_sum_of_unsettled_escrow(board: Board) -> eyre::Result<()> {
    let approved = board.submitted("approved").await?;
    let refunded = board.post("refunded", Duration::hours(1)).await?;
    let _open = board.post("open", Duration::hours(1)).await?;
    let claimed = board.post("claimed", Duration::hours(1)).await?;
    board.service.claim_task(&board.freelancer, claimed.id()).await?;

    board.service.approve_task(&board.client, approved).await?;
    board.service.refund_task(&board.client, refunded.id()).await?;

    let unsettled = board
        .service
        .list_tasks(&bountyboard::escrow::ports::TaskFilter::All)
        .await?
        .iter()
        .filter(|task| !task.status().is_terminal())
        .try_fold(Amount::ZERO, |total, task| total.checked_add(task.amount()))
        .ok_or_else(|| eyre::eyre!("escrow total overflowed"))?;

    eyre::ensure!(board.service.custody_balance().await? == unsettled);
    eyre::ensure!(unsettled == Amount::new(2_000_000));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn escrow_cannot_be_relocked_from_custody(board: Board) -> eyre::Result<()> {
    let honest = board.submitted("honest").await?;
    let attacker = AccountId::new("ATTACKER")?;
    let custody = board.service.custody_account().clone();
    let request = CreateTaskRequest::new("free money", epoch() + Duration::hours(1), LOCKED)
        .with_fund_lock(Payment::new(custody.clone(), custody, LOCKED));

    let refused = board.service.create_task(&attacker, request).await;
    eyre::ensure!(
        refused.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::AtomicGroupViolation)
    );

    let approved = board.service.approve_task(&board.client, honest).await?;
    eyre::ensure!(approved.status() == TaskStatus::Approved);
    eyre::ensure!(board.service.balance(&board.freelancer).await? == LOCKED);
    eyre::ensure!(board.service.balance(&attacker).await? == Amount::ZERO);
    eyre::ensure!(board.service.custody_balance().await? == Amount::ZERO);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fund_lock_must_be_paid_by_the_creator(board: Board) -> eyre::Result<()> {
    let organiser = AccountId::new("ORGANISER")?;
    let deadline = epoch() + Duration::hours(1);
    let request = CreateTaskRequest::new("Paid for by someone else", deadline, LOCKED)
        .with_fund_lock(Payment::new(
            board.client.clone(),
            board.service.custody_account().clone(),
            LOCKED,
        ));

    let refused = board.service.create_task(&organiser, request).await;

    eyre::ensure!(
        refused.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::AtomicGroupViolation)
    );
    eyre::ensure!(board.service.balance(&board.client).await? == CLIENT_FUNDS);
    eyre::ensure!(board.service.next_task_id().await? == TaskId::FIRST);
    Ok(())
}
