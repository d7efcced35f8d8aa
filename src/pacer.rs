//! リクエスト間隔の制御
//!
//! 容量1のトークンバケット。最初の呼び出しは待たず、以降は前回の取得から
//! `interval` 経過するまで待つ。

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next_slot: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: None,
        }
    }

    /// 次のリクエストが許可されるまで待つ
    pub async fn wait(&mut self) {
        if let Some(slot) = self.next_slot {
            if slot > Instant::now() {
                sleep_until(slot).await;
            }
        }
        self.next_slot = Some(Instant::now() + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_wait_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_millis(1001));
        let start = Instant::now();
        pacer.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successive_waits_are_spaced() {
        let mut pacer = Pacer::new(Duration::from_millis(1001));
        let start = Instant::now();

        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        assert_eq!(start.elapsed(), Duration::from_millis(2002));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        pacer.wait().await;

        tokio::time::advance(Duration::from_millis(800)).await;
        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_interval_waits_remainder() {
        let mut pacer = Pacer::new(Duration::from_millis(1000));
        pacer.wait().await;

        tokio::time::advance(Duration::from_millis(300)).await;
        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(before.elapsed(), Duration::from_millis(700));
    }
}
