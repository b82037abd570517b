//! End-to-end escrow lifecycle scenarios against the in-memory ledger.

use bountyboard::escrow::{
    domain::{Amount, TaskId, TaskStatus},
    services::EscrowErrorKind,
};
use chrono::Duration;
use rstest::rstest;

use super::helpers::{Board, CLIENT_FUNDS, LOCKED, board};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posting_a_task_moves_the_escrow_into_custody(board: Board) -> eyre::Result<()> {
    let task = board.post("T1", Duration::seconds(3_600)).await?;

    eyre::ensure!(task.id() == TaskId::FIRST, "first task must receive id 0");
    eyre::ensure!(task.status() == TaskStatus::Open);
    eyre::ensure!(task.amount() == LOCKED);
    eyre::ensure!(task.freelancer().is_none());
    eyre::ensure!(board.service.custody_balance().await? == LOCKED);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_task_can_only_be_claimed_once(board: Board) -> eyre::Result<()> {
    let task = board.post("T1", Duration::seconds(3_600)).await?;

    let claimed = board.service.claim_task(&board.freelancer, task.id()).await?;
    eyre::ensure!(claimed.status() == TaskStatus::Claimed);
    eyre::ensure!(claimed.freelancer() == Some(&board.freelancer));

    for caller in [&board.freelancer, &board.stranger, &board.client] {
        let again = board.service.claim_task(caller, task.id()).await;
        eyre::ensure!(
            again.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::InvalidState),
            "second claim by {caller} must be refused as invalid state"
        );
    }
    let stored = board.service.get_task(task.id()).await?;
    eyre::ensure!(stored.freelancer() == Some(&board.freelancer));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_pays_the_freelancer_once(board: Board) -> eyre::Result<()> {
    let task = board.post("T1", Duration::seconds(3_600)).await?;
    board.service.claim_task(&board.freelancer, task.id()).await?;

    let submitted = board
        .service
        .submit_work(&board.freelancer, task.id(), "hash123")
        .await?;
    eyre::ensure!(submitted.status() == TaskStatus::Submitted);
    eyre::ensure!(submitted.proof().map(|proof| proof.as_str()) == Some("hash123"));

    let approved = board.service.approve_task(&board.client, task.id()).await?;
    eyre::ensure!(approved.status() == TaskStatus::Approved);
    eyre::ensure!(board.service.balance(&board.freelancer).await? == LOCKED);
    eyre::ensure!(board.service.custody_balance().await? == Amount::ZERO);

    let replay = board.service.approve_task(&board.client, task.id()).await;
    eyre::ensure!(replay.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::InvalidState));
    eyre::ensure!(board.service.balance(&board.freelancer).await? == LOCKED);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anyone_may_refund_an_expired_task(board: Board) -> eyre::Result<()> {
    let task = board.post("T1", Duration::seconds(-1)).await?;
    eyre::ensure!(board.service.balance(&board.client).await? == Amount::new(9_000_000));

    let refunded = board.service.refund_task(&board.stranger, task.id()).await?;

    eyre::ensure!(refunded.status() == TaskStatus::Refunded);
    eyre::ensure!(refunded.freelancer().is_none());
    eyre::ensure!(board.service.balance(&board.client).await? == CLIENT_FUNDS);
    eyre::ensure!(board.service.custody_balance().await? == Amount::ZERO);
    Ok(())
}

#[rstest]
#[case::claim("claim")]
#[case::approve("approve")]
#[case::reject("reject")]
#[case::submit("submit")]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_tasks_refuse_every_operation(
    board: Board,
    #[case] operation: &str,
) -> eyre::Result<()> {
    let task = board.post("T1", Duration::hours(1)).await?;
    board.service.refund_task(&board.client, task.id()).await?;

    let result = match operation {
        "claim" => board.service.claim_task(&board.freelancer, task.id()).await,
        "approve" => board.service.approve_task(&board.client, task.id()).await,
        "reject" => board.service.reject_task(&board.client, task.id()).await,
        _ => {
            board
                .service
                .submit_work(&board.freelancer, task.id(), "late")
                .await
        }
    };

    eyre::ensure!(result.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::InvalidState));
    eyre::ensure!(board.service.balance(&board.client).await? == CLIENT_FUNDS);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claimed_task_can_be_refunded_by_client_before_deadline(board: Board) -> eyre::Result<()> {
    let task = board.post("T1", Duration::hours(1)).await?;
    board.service.claim_task(&board.freelancer, task.id()).await?;

    let by_freelancer = board.service.refund_task(&board.freelancer, task.id()).await;
    eyre::ensure!(
        by_freelancer.map_err(|err| err.kind()).err() == Some(EscrowErrorKind::Unauthorized)
    );

    let refunded = board.service.refund_task(&board.client, task.id()).await?;
    eyre::ensure!(refunded.status() == TaskStatus::Refunded);
    eyre::ensure!(board.service.balance(&board.freelancer).await? == Amount::ZERO);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identifiers_are_contiguous_across_failures(board: Board) -> eyre::Result<()> {
    let first = board.post("first", Duration::hours(1)).await?;
    let blank = board.post("  ", Duration::hours(1)).await;
    let second = board.post("second", Duration::hours(1)).await?;

    eyre::ensure!(blank.is_err());
    eyre::ensure!(first.id() == TaskId::new(0));
    eyre::ensure!(second.id() == TaskId::new(1));
    eyre::ensure!(board.service.next_task_id().await? == TaskId::new(2));
    Ok(())
}
