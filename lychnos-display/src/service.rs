//! Shared-panel service
//!
//! The panel's mutable state (framebuffer, contrast, power state, idle
//! deadline) is touched from two contexts: caller operations and the idle
//! timeout. Both serialize on one mutex owning the [`Ssd1306`] value:
//! callers lock, apply their operation and unlock; the idle task sleeps
//! until the armed deadline and applies the Dim/Sleep transition through
//! the same lock. A signal kicks the idle task whenever an operation moved
//! the deadline.
//!
//! Activity-triggered wake/undim therefore always completes before the
//! triggering operation's bytes hit the bus, and no timer transition can
//! interleave with a caller operation.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use embedded_hal_async::i2c::I2c;

use lychnos_core::power::PowerState;
use lychnos_core::text::GlyphCanvas;

use crate::ssd1306::Ssd1306;

/// Mutex owning the panel.
pub type PanelMutex<I2C> = Mutex<CriticalSectionRawMutex, Ssd1306<I2C>>;

/// Kick signal: raised after any operation that may have moved the idle
/// deadline.
pub type IdleKick = Signal<CriticalSectionRawMutex, ()>;

/// Applies idle timeouts to the shared panel.
///
/// Sleeps until the armed deadline (or until kicked), then feeds the
/// timeout through the mutex. Spurious wakeups are harmless: the deadline
/// is re-checked under the lock.
pub async fn idle_task<I2C: I2c>(panel: &PanelMutex<I2C>, kick: &IdleKick) -> ! {
    loop {
        let deadline = panel.lock().await.idle_deadline();
        match deadline {
            None => kick.wait().await,
            Some(at) => {
                if let Either::First(()) = select(Timer::at(at), kick.wait()).await {
                    let mut panel = panel.lock().await;
                    if panel.idle_due(Instant::now()) {
                        if let Err(e) = panel.on_idle_timeout().await {
                            log::warn!("idle transition failed: {e:?}");
                        }
                    }
                }
            }
        }
    }
}

/// Caller handle over the shared panel.
///
/// Every method locks, applies the operation (blocking the caller until it
/// is done) and kicks the idle task.
pub struct Display<'a, I2C> {
    panel: &'a PanelMutex<I2C>,
    kick: &'a IdleKick,
}

impl<'a, I2C> Display<'a, I2C>
where
    I2C: I2c,
{
    pub fn new(panel: &'a PanelMutex<I2C>, kick: &'a IdleKick) -> Self {
        Self { panel, kick }
    }

    fn kicked<T>(&self, result: T) -> T {
        self.kick.signal(());
        result
    }

    pub async fn clear_screen(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.clear_screen().await;
        self.kicked(result)
    }

    pub async fn send_message(&self, message: &str) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.send_message(message).await;
        self.kicked(result)
    }

    pub async fn send_message_sized(&self, message: &str, size: u32) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .send_message_sized(message, size)
            .await;
        self.kicked(result)
    }

    pub async fn display_canvas(&self, canvas: &GlyphCanvas) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.display_canvas(canvas).await;
        self.kicked(result)
    }

    pub async fn display_alien(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.display_alien().await;
        self.kicked(result)
    }

    pub async fn display_clock(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.display_clock().await;
        self.kicked(result)
    }

    pub async fn demo(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.demo().await;
        self.kicked(result)
    }

    pub async fn set_contrast(&self, percentage: u8) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.set_contrast(percentage).await;
        self.kicked(result)
    }

    pub async fn send_buffer(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.send_buffer().await;
        self.kicked(result)
    }

    pub async fn clear_buffer(&self) {
        self.panel.lock().await.clear_buffer();
    }

    pub async fn set_pixel(&self, x: i32, y: i32, on: bool) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.set_pixel(x, y, on).await;
        self.kicked(result)
    }

    pub async fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_line(x0, y0, x1, y1).await;
        self.kicked(result)
    }

    pub async fn draw_horizontal_line(&self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_horizontal_line(x, y, w).await;
        self.kicked(result)
    }

    pub async fn draw_vertical_line(&self, x: i32, y: i32, h: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_vertical_line(x, y, h).await;
        self.kicked(result)
    }

    pub async fn draw_rectangle(&self, x: i32, y: i32, w: i32, h: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_rectangle(x, y, w, h).await;
        self.kicked(result)
    }

    pub async fn draw_filled_rectangle(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .draw_filled_rectangle(x, y, w, h)
            .await;
        self.kicked(result)
    }

    pub async fn draw_square(&self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_square(x, y, w).await;
        self.kicked(result)
    }

    pub async fn draw_filled_square(&self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_filled_square(x, y, w).await;
        self.kicked(result)
    }

    pub async fn draw_circle(&self, x: i32, y: i32, r: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_circle(x, y, r).await;
        self.kicked(result)
    }

    pub async fn draw_filled_circle(&self, x: i32, y: i32, r: i32) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_filled_circle(x, y, r).await;
        self.kicked(result)
    }

    pub async fn draw_triangle(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .draw_triangle(x0, y0, x1, y1, x2, y2)
            .await;
        self.kicked(result)
    }

    pub async fn draw_triangle_about(
        &self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .draw_triangle_about(cx, cy, w, h)
            .await;
        self.kicked(result)
    }

    pub async fn draw_filled_triangle(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .draw_filled_triangle(x0, y0, x1, y1, x2, y2)
            .await;
        self.kicked(result)
    }

    pub async fn draw_filled_triangle_about(
        &self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        let result = self
            .panel
            .lock()
            .await
            .draw_filled_triangle_about(cx, cy, w, h)
            .await;
        self.kicked(result)
    }

    pub async fn draw_test_pattern(&self) -> Result<(), I2C::Error> {
        let result = self.panel.lock().await.draw_test_pattern().await;
        self.kicked(result)
    }

    pub async fn power_state(&self) -> PowerState {
        self.panel.lock().await.power_state()
    }

    pub async fn contrast(&self) -> u8 {
        self.panel.lock().await.contrast()
    }
}
