//! One-shot status-light timer using ESP-IDF's esp_timer API.
//!
//! A single `esp_timer` client whose callback invokes a plain `fn()`
//! supplied at construction (in the binary: lock the shared scheduler and
//! run `on_timer_fire`).  On simulation targets the timer only records
//! what it was asked to do; nothing ever fires.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they may take the scheduler's critical-section lock.

use embassy_time::Duration;

use crate::app::ports::OneShotTimer;
use crate::error::TimerError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn light_timer_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` was produced from a `fn()` in `allocate()`; function
    // pointers and data pointers have the same size on Xtensa/RISC-V.
    let on_fire: fn() = unsafe { core::mem::transmute::<*mut core::ffi::c_void, fn()>(arg) };
    on_fire();
}

pub struct EspOneShotTimer {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    on_fire: fn(),
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(not(target_os = "espidf"))]
    allocated: bool,
    #[cfg(not(target_os = "espidf"))]
    pending: Option<Duration>,
}

// SAFETY: the raw esp_timer handle is only touched through `&mut self`,
// and the owning scheduler is always behind a lock.
#[cfg(target_os = "espidf")]
unsafe impl Send for EspOneShotTimer {}

impl EspOneShotTimer {
    /// `on_fire` runs in the esp_timer task each time the timer expires.
    #[cfg(target_os = "espidf")]
    pub fn new(on_fire: fn()) -> Self {
        Self {
            on_fire,
            handle: core::ptr::null_mut(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(on_fire: fn()) -> Self {
        Self {
            on_fire,
            allocated: false,
            pending: None,
        }
    }
}

#[cfg(target_os = "espidf")]
impl OneShotTimer for EspOneShotTimer {
    fn allocate(&mut self) -> Result<(), TimerError> {
        if !self.handle.is_null() {
            return Ok(());
        }
        let args = esp_timer_create_args_t {
            callback: Some(light_timer_cb),
            arg: self.on_fire as *const () as *mut core::ffi::c_void,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"led_blink_timer\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        // SAFETY: `args` outlives the call; the handle is written once here.
        let ret = unsafe { esp_timer_create(&args, &mut self.handle) };
        if ret != ESP_OK as i32 {
            self.handle = core::ptr::null_mut();
            return Err(TimerError::CreateFailed(ret));
        }
        log::info!("hw_timer: status-light timer created");
        Ok(())
    }

    fn arm_once(&mut self, after: Duration) -> Result<(), TimerError> {
        if self.handle.is_null() {
            return Err(TimerError::NotAllocated);
        }
        // esp_timer_start_once refuses an active timer; replace the old arm.
        self.cancel()?;
        // SAFETY: handle is a live timer created in allocate().
        let ret = unsafe { esp_timer_start_once(self.handle, after.as_micros()) };
        if ret != ESP_OK as i32 {
            return Err(TimerError::StartFailed(ret));
        }
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), TimerError> {
        if self.handle.is_null() {
            return Err(TimerError::NotAllocated);
        }
        // SAFETY: handle is a live timer created in allocate().
        let ret = unsafe { esp_timer_stop(self.handle) };
        // ESP_ERR_INVALID_STATE: timer was not running.
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(TimerError::StopFailed(ret));
        }
        Ok(())
    }

    fn is_pending(&self) -> bool {
        // SAFETY: read-only query on a live handle; null-checked.
        !self.handle.is_null() && unsafe { esp_timer_is_active(self.handle) }
    }

    fn release(&mut self) -> Result<(), TimerError> {
        if self.handle.is_null() {
            return Ok(());
        }
        // SAFETY: stop before delete; handle is nulled so it can't be reused.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
        }
        self.handle = core::ptr::null_mut();
        log::info!("hw_timer: status-light timer deleted");
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl OneShotTimer for EspOneShotTimer {
    fn allocate(&mut self) -> Result<(), TimerError> {
        log::info!("hw_timer(sim): status-light timer allocated (never fires)");
        self.allocated = true;
        Ok(())
    }

    fn arm_once(&mut self, after: Duration) -> Result<(), TimerError> {
        if !self.allocated {
            return Err(TimerError::NotAllocated);
        }
        self.pending = Some(after);
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), TimerError> {
        if !self.allocated {
            return Err(TimerError::NotAllocated);
        }
        self.pending = None;
        Ok(())
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn release(&mut self) -> Result<(), TimerError> {
        self.allocated = false;
        self.pending = None;
        Ok(())
    }
}
