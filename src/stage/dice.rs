use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::env::PacingSettings;
use crate::errors::ClientResult;
use crate::stage::DiceVisual;

/// Dice effect with scale-in/out and a random tumble that settles on the
/// rolled face.
pub struct TweenDice {
    pacing: PacingSettings,
}

impl TweenDice {
    pub fn new(pacing: PacingSettings) -> Self {
        Self { pacing }
    }
}

#[async_trait]
impl DiceVisual for TweenDice {
    async fn show(&self) -> ClientResult<()> {
        debug!("dice scaling in");
        tokio::time::sleep(self.pacing.dice_show()).await;
        Ok(())
    }

    async fn roll(&self, value: u8) -> ClientResult<()> {
        let tumble: Vec<f32> = {
            let mut rng = rand::thread_rng();
            (0..3).map(|_| rng.gen_range(0.0..4.0)).collect()
        };
        debug!("dice tumbling through {:?} turns, settling on {}", tumble, value);
        tokio::time::sleep(self.pacing.dice_roll()).await;
        Ok(())
    }

    async fn hide(&self) -> ClientResult<()> {
        debug!("dice scaling out");
        tokio::time::sleep(self.pacing.dice_hide()).await;
        Ok(())
    }
}
