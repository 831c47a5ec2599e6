//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures the ADC channels, the probe/bias/LED GPIOs and the edge
//! interrupt using raw ESP-IDF sys calls.  `init_peripherals()` is called
//! once from `main()` before the probe loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real register access.
//! On host/test: levels and ADC codes come from atomics that tests and the
//! simulator can inject.

use core::convert::Infallible;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::app::ports::BiasMode;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── Simulation state (host only) ──────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_LEVEL: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; 2] = [AtomicU16::new(0), AtomicU16::new(0)];
#[cfg(not(target_os = "espidf"))]
static SIM_BIAS: AtomicU8 = AtomicU8::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(high: bool) {
    SIM_LEVEL.store(high, Ordering::Relaxed);
}

/// Inject a native-resolution (12-bit) code for an ADC1 channel.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(sim_adc_slot(channel)) {
        slot.store(raw, Ordering::Relaxed);
    }
}

/// Last bias mode written through [`bias_set`].
#[cfg(not(target_os = "espidf"))]
pub fn sim_bias() -> BiasMode {
    match SIM_BIAS.load(Ordering::Relaxed) {
        1 => BiasMode::PullHigh,
        2 => BiasMode::PullLow,
        _ => BiasMode::Disconnected,
    }
}

#[cfg(not(target_os = "espidf"))]
const SIM_ERR_INVALID_ARG: i32 = 0x102;

#[cfg(not(target_os = "espidf"))]
fn sim_adc_slot(channel: u32) -> usize {
    match channel {
        crate::pins::SELECTOR_ADC_CHANNEL => 0,
        crate::pins::PROBE_ADC_CHANNEL => 1,
        _ => usize::MAX,
    }
}

// ── Peripheral init ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the probe loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    // 12 dB attenuation: full scale tracks the divided-down 5 V supply.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::SELECTOR_ADC_CHANNEL, pins::PROBE_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH{}=selector, CH{}=probe)",
        pins::SELECTOR_ADC_CHANNEL, pins::PROBE_ADC_CHANNEL);
    Ok(())
}

/// `esp_err_t` the oneshot driver returns when a conversion never completes.
#[cfg(target_os = "espidf")]
pub const ADC_ERR_TIMEOUT: i32 = ESP_ERR_TIMEOUT as i32;
#[cfg(not(target_os = "espidf"))]
pub const ADC_ERR_TIMEOUT: i32 = 0x107;

/// One blocking oneshot conversion at native resolution.  `Err` carries
/// the driver's `esp_err_t`.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.max(0) as u16)
}

/// Sim: `Err` for a channel the board does not wire up.
#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    SIM_ADC
        .get(sim_adc_slot(channel))
        .map(|slot| slot.load(Ordering::Relaxed))
        .ok_or(SIM_ERR_INVALID_ARG)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Probe sense: plain input, any-edge interrupt (masked until armed).
    let sense = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PROBE_SENSE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    let ret = unsafe { gpio_config(&sense) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_intr_disable(pins::PROBE_SENSE_GPIO) };

    // Bias: starts as a floating input.
    let bias = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BIAS_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&bias) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    for pin in [pins::LED_LINE0_GPIO, pins::LED_LINE1_GPIO, pins::LED_LINE2_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO configured (sense={}, bias={}, leds={}/{}/{})",
        pins::PROBE_SENSE_GPIO, pins::BIAS_GPIO,
        pins::LED_LINE0_GPIO, pins::LED_LINE1_GPIO, pins::LED_LINE2_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on a
    // configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    SIM_LEVEL.load(Ordering::Relaxed)
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> bool {
    // SAFETY: gpio_set_level writes to a configured output pin. Main-loop only.
    (unsafe { gpio_set_level(pin, u32::from(high)) }) == ESP_OK as i32
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> bool {
    true
}

/// Switch the bias pin between output-high, output-low and input.
#[cfg(target_os = "espidf")]
pub fn bias_set(pin: i32, mode: BiasMode) -> bool {
    // SAFETY: the bias pin is only reconfigured from the main loop; level is
    // written before the direction so the pin never glitches the other way.
    unsafe {
        let ret = match mode {
            BiasMode::Disconnected => gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT),
            BiasMode::PullHigh | BiasMode::PullLow => {
                let level = u32::from(mode == BiasMode::PullHigh);
                let ret = gpio_set_level(pin, level);
                if ret != ESP_OK as i32 {
                    return false;
                }
                gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT)
            }
        };
        ret == ESP_OK as i32
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn bias_set(_pin: i32, mode: BiasMode) -> bool {
    let code = match mode {
        BiasMode::Disconnected => 0,
        BiasMode::PullHigh => 1,
        BiasMode::PullLow => 2,
    };
    SIM_BIAS.store(code, Ordering::Relaxed);
    true
}

/// Unmask or mask the probe edge interrupt.
#[cfg(target_os = "espidf")]
pub fn probe_intr_enable(enable: bool) -> bool {
    // SAFETY: toggles the interrupt enable bit of an already-configured pin.
    let ret = unsafe {
        if enable {
            gpio_intr_enable(pins::PROBE_SENSE_GPIO)
        } else {
            gpio_intr_disable(pins::PROBE_SENSE_GPIO)
        }
    };
    ret == ESP_OK as i32
}

#[cfg(not(target_os = "espidf"))]
pub fn probe_intr_enable(_enable: bool) -> bool {
    true
}

// ── embedded-hal pin handles ──────────────────────────────────

/// Output GPIO by number.
pub struct GpioOut(pub i32);

/// Input GPIO by number.
pub struct GpioIn(pub i32);

/// Error for a rejected GPIO write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioWriteError(pub i32);

impl embedded_hal::digital::Error for GpioWriteError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for GpioOut {
    type Error = GpioWriteError;
}

impl OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if gpio_write(self.0, false) { Ok(()) } else { Err(GpioWriteError(self.0)) }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if gpio_write(self.0, true) { Ok(()) } else { Err(GpioWriteError(self.0)) }
    }
}

impl ErrorType for GpioIn {
    type Error = Infallible;
}

impl InputPin for GpioIn {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.0))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.0))
    }
}

// ── Busy-wait delay ───────────────────────────────────────────

/// Microsecond busy-wait.  ROM delay on hardware, thread sleep in simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusyDelay;

impl DelayNs for BusyDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn probe_edge_isr(_arg: *mut core::ffi::c_void) {
    crate::drivers::edge_latch::probe_edge_isr_handler();
}

/// Install the per-pin GPIO ISR service and register the probe edge handler.
/// The interrupt stays masked until the edge latch is armed.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service was already
    // installed (acceptable).  The handler only stores to an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        let ret = gpio_isr_handler_add(
            pins::PROBE_SENSE_GPIO,
            Some(probe_edge_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_disable(pins::PROBE_SENSE_GPIO);
        info!("hw_init: ISR service installed (probe edge)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
