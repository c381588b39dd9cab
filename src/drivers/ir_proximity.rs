use embassy_stm32::adc::Adc;
use embassy_stm32::gpio::{AnyPin, Level, Output, Speed};
use embassy_stm32::peripherals::{ADC1, PA0, PA1, PA2, PA3, PC4, PC5};
use embassy_time::{Duration, Timer};

use slope_follower::control::proximity::SENSOR_COUNT;
use slope_follower::hal::ProximitySensors;

/// Settling time of a receiver after its emitter switches on.
const PULSE_SETTLE: Duration = Duration::from_micros(150);

/// Receiver inputs in frame order: RightSide (IR2), RightCenter (IR1),
/// RightFront (IR0), LeftFront (IR7), LeftCenter (IR6), LeftSide (IR5).
pub struct IrReceivers {
    pub right_side: PA2,
    pub right_center: PA1,
    pub right_front: PA0,
    pub left_front: PC5,
    pub left_center: PC4,
    pub left_side: PA3,
}

/// Six IR emitter/receiver pairs sampled in the dark and lit.
///
/// A reflecting obstacle pulls the receiver down while its emitter is on;
/// the reading is the drop (ambient − lit) minus the drop measured at startup
/// with nothing in range. Sampling happens in [`IrProximity::acquire`], which
/// yields to the executor while each emitter settles; `read_proximity` hands
/// out the last acquired frame.
pub struct IrProximity {
    adc: Adc<'static, ADC1>,
    receivers: IrReceivers,
    emitters: [Output<'static, AnyPin>; SENSOR_COUNT],
    offset: [u16; SENSOR_COUNT],
    frame: [u16; SENSOR_COUNT],
}

impl IrProximity {
    pub fn new(adc: Adc<'static, ADC1>, receivers: IrReceivers, emitters: [AnyPin; SENSOR_COUNT]) -> Self {
        Self {
            adc,
            receivers,
            emitters: emitters.map(|pin| Output::new(pin, Level::Low, Speed::Low)),
            offset: [0; SENSOR_COUNT],
            frame: [0; SENSOR_COUNT],
        }
    }

    fn sample(&mut self, index: usize) -> u16 {
        let rx = &mut self.receivers;
        match index {
            0 => self.adc.read(&mut rx.right_side),
            1 => self.adc.read(&mut rx.right_center),
            2 => self.adc.read(&mut rx.right_front),
            3 => self.adc.read(&mut rx.left_front),
            4 => self.adc.read(&mut rx.left_center),
            _ => self.adc.read(&mut rx.left_side),
        }
    }

    /// Reflected signal of each sensor, without offset correction.
    async fn read_reflection(&mut self) -> [u16; SENSOR_COUNT] {
        let mut out = [0u16; SENSOR_COUNT];
        for (i, slot) in out.iter_mut().enumerate() {
            let ambient = self.sample(i);
            self.emitters[i].set_high();
            Timer::after(PULSE_SETTLE).await;
            let lit = self.sample(i);
            self.emitters[i].set_low();
            *slot = ambient.saturating_sub(lit);
        }
        out
    }

    /// Average `samples` frames with nothing in range as the zero level.
    pub async fn calibrate(&mut self, samples: u16) {
        let mut acc = [0u32; SENSOR_COUNT];
        for _ in 0..samples.max(1) {
            let frame = self.read_reflection().await;
            for (a, v) in acc.iter_mut().zip(frame) {
                *a += v as u32;
            }
        }
        for (o, a) in self.offset.iter_mut().zip(acc) {
            *o = (a / samples.max(1) as u32) as u16;
        }
        defmt::info!("IR offsets {}", self.offset);
    }

    /// Sample all six pairs and keep the offset-corrected frame.
    pub async fn acquire(&mut self) {
        let mut frame = self.read_reflection().await;
        for (v, o) in frame.iter_mut().zip(self.offset) {
            *v = v.saturating_sub(o);
        }
        self.frame = frame;
    }
}

impl ProximitySensors for IrProximity {
    type Error = core::convert::Infallible;

    fn read_proximity(&mut self) -> Result<[u16; SENSOR_COUNT], Self::Error> {
        Ok(self.frame)
    }
}
