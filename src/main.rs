//! M17 TNC Main Application
//!
//! Entry point for the STM32G474-based M17 receiver firmware.
//! Initializes hardware and spawns async tasks: audio sampling and
//! demodulation, frame consumption, battery monitoring, heartbeat.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::peripherals;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Ticker;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use m17_tnc::demod::Demodulator;
use m17_tnc::frame::{FramePool, OwnedFrame};
use m17_tnc::hal::{AudioInput, BatteryMonitor};
use m17_tnc::power::BatterySense;
use m17_tnc::prelude::*;

/// Demodulated frames waiting for the frame task.
///
/// A frame lasts ~40 ms on air, so even a shallow queue only fills if
/// the consumer stalls for several frame times.
const FRAME_QUEUE_DEPTH: usize = 4;

/// One ADC block at 48 kHz.
const BLOCK_PERIOD_US: u64 = (ADC_BLOCK_SIZE as u64 * 1_000_000) / SAMPLE_RATE as u64;

/// Shared frame storage, borrowed by both sides of the frame queue.
static FRAME_POOL: FramePool = FramePool::new();

/// Frames in flight between the sampling task and the frame task.
static FRAME_QUEUE: Channel<CriticalSectionRawMutex, OwnedFrame<'static>, FRAME_QUEUE_DEPTH> =
    Channel::new();

/// The demodulator is a few kilobytes of state; park it in a static
/// instead of moving it through the task arena.
static DEMODULATOR: StaticCell<Demodulator> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("M17 TNC firmware v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "{=u32} Hz sampling, {=u32} baud 4FSK, {=usize}-sample blocks",
        SAMPLE_RATE,
        SYMBOL_RATE,
        ADC_BLOCK_SIZE
    );

    // Initialize STM32G474 peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("peripherals initialized");

    // Status LED on PA5 (Nucleo LD2), lock indicator on PB0
    let status_led = Output::new(p.PA5, Level::Low, Speed::Low);
    let lock_led = Output::new(p.PB0, Level::Low, Speed::Low);

    // Discriminator audio on PA0 (ADC1), battery divider on PA1 (ADC2)
    let mut audio = AudioInput::new(p.ADC1);
    audio.configure();
    let battery = BatteryMonitor::new(p.ADC2, p.PA1);

    let demod = DEMODULATOR.init(Demodulator::new());

    spawner.spawn(sampling_task(audio, p.PA0, demod, lock_led)).unwrap();
    spawner.spawn(frame_task()).unwrap();
    spawner.spawn(battery_task(battery)).unwrap();
    spawner.spawn(heartbeat_task(status_led)).unwrap();

    info!("tasks spawned, receiver running");

    loop {
        Timer::after(Duration::from_secs(10)).await;
        debug!("pool: {=usize} free segments", FRAME_POOL.available());
    }
}

/// Audio sampling and demodulation task
///
/// Pulls one block of discriminator samples per tick, runs it through
/// the demodulator, and hands completed frames to the frame task. The
/// lock LED mirrors carrier lock.
#[embassy_executor::task]
async fn sampling_task(
    mut audio: AudioInput<'static>,
    mut audio_pin: peripherals::PA0,
    demod: &'static mut Demodulator,
    mut lock_led: Output<'static>,
) {
    // TODO: drive the ADC from a TIM2 trigger with DMA once the block
    // reader is replaced; blocking conversions pace unevenly within a
    // block even though the block cadence is held by the ticker.
    let mut ticker = Ticker::every(Duration::from_micros(BLOCK_PERIOD_US));
    let mut block = [0_i16; ADC_BLOCK_SIZE];

    demod.start();
    info!("demodulator started");

    loop {
        ticker.next().await;
        audio.read_block(&mut audio_pin, &mut block);

        if let Some(frame) = demod.demod_block(&FRAME_POOL, &block) {
            if FRAME_QUEUE.try_send(frame).is_err() {
                // The dropped frame releases its segments on its way out.
                warn!("frame queue full, dropping frame");
            }
        }

        if demod.locked() {
            lock_led.set_high();
        } else {
            lock_led.set_low();
        }
    }
}

/// Frame consumer task
///
/// Logs validated link frames and returns their pool segments. Quiet
/// periods are reported so a dead receive path is visible on the
/// console.
#[embassy_executor::task]
async fn frame_task() {
    let mut payload = [0_u8; LINK_FRAME_BYTES];

    loop {
        match select(FRAME_QUEUE.receive(), Timer::after(Duration::from_secs(5))).await {
            Either::First(frame) => {
                let len = frame.copy_to(&mut payload);
                info!("link frame ({=usize} bytes): {=[u8]:02x}", len, &payload[..len]);
                frame.release();
            }
            Either::Second(()) => {
                debug!("no frames in the last 5 s");
            }
        }
    }
}

/// Battery monitoring task
#[embassy_executor::task]
async fn battery_task(mut battery: BatteryMonitor<'static, peripherals::PA1>) {
    loop {
        let voltage = battery.read();
        if voltage.is_critical() {
            error!("battery critical: {}", voltage);
        } else if voltage.is_low() {
            warn!("battery low: {}", voltage);
        } else {
            info!("battery: {} ({=u8}%)", voltage, voltage.percentage());
        }
        Timer::after(Duration::from_secs(30)).await;
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
