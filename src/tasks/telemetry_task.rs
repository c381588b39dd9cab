use embassy_executor::task;
use embassy_stm32::peripherals::{DMA1_CH3, USART3};
use embassy_stm32::usart::UartTx;
use embassy_time::Ticker;

use slope_follower::config::TELEMETRY_PERIOD;
use slope_follower::telemetry::status_line;

use crate::{ALERT, MODE, SLOPE};

/// Telemetry task, 2 Hz status line on the USART3 debug port.
#[task]
pub async fn telemetry_task(mut uart: UartTx<'static, USART3, DMA1_CH3>) {
    let mut ticker = Ticker::every(TELEMETRY_PERIOD);
    loop {
        ticker.next().await;

        let line = status_line(SLOPE.latest(), ALERT.latest(), MODE.latest());
        if uart.write(line.as_bytes()).await.is_err() {
            defmt::warn!("telemetry write failed");
        }
    }
}
