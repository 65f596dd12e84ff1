//! SSD1306 panel driver
//!
//! Owns the bus, the packed framebuffer and the power machine. Every
//! caller-facing drawing, text or transmission operation records activity
//! first, so a dimmed or sleeping panel is back at full drive strength
//! before the operation's bytes hit the bus.

use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::i2c::I2c;

use lychnos_core::config::DisplayConfig;
use lychnos_core::framebuffer::FrameBuffer;
use lychnos_core::power::{PowerAction, PowerMachine, PowerPlan, PowerState, TimerOp};
use lychnos_core::raster;
use lychnos_core::text::{self, FontCatalog, GlyphCanvas};

use crate::cmd;

/// Conventional SSD1306 I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Bytes per data write on the bus.
const DATA_CHUNK: usize = 16;

/// Total time one contrast fade is allowed to take, split evenly across
/// the contrast delta.
const FADE_BUDGET_MS: u32 = 500;

const BOOT_MESSAGE: &str = "Online and waiting for command...";
const SHUTDOWN_MESSAGE: &str = "Offline...";

/// Driver for one SSD1306-class panel.
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    config: DisplayConfig,
    max_page: u8,
    frame: FrameBuffer,
    fonts: FontCatalog,
    power: PowerMachine,
    contrast: u8,
    deadline: Option<Instant>,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Bring up a panel at the conventional address: init sequence, clear,
    /// boot message.
    pub async fn new(i2c: I2C, config: DisplayConfig) -> Result<Self, I2C::Error> {
        Self::with_address(i2c, DEFAULT_ADDRESS, config).await
    }

    /// Bring up a panel at a specific I2C address.
    pub async fn with_address(
        i2c: I2C,
        address: u8,
        config: DisplayConfig,
    ) -> Result<Self, I2C::Error> {
        let max_page = if config.rows > 32 { 7 } else { 3 };
        let mut panel = Self {
            i2c,
            address,
            max_page,
            frame: FrameBuffer::new(config.columns as usize, config.rows as usize),
            fonts: FontCatalog::builtin(),
            power: PowerMachine::new(config.idle),
            contrast: config.contrast,
            config,
            deadline: None,
        };
        panel.init().await?;
        panel.clear_screen().await?;
        panel.send_message(BOOT_MESSAGE).await?;
        Ok(panel)
    }

    /// Power-up command sequence.
    async fn init(&mut self) -> Result<(), I2C::Error> {
        let init_seq: [&[u8]; 15] = [
            &[cmd::DISPLAY_OFF],
            &[cmd::SET_CLOCK_DIV, 0x80],
            &[cmd::SET_MUX_RATIO, (self.config.rows - 1) as u8],
            &[cmd::SET_DISPLAY_OFFSET, 0x00],
            &[cmd::SET_START_LINE],
            &[cmd::SET_CHARGE_PUMP, 0x14],
            &[cmd::SET_MEMORY_MODE, 0x00], // horizontal addressing
            &[cmd::SET_SEG_REMAP],
            &[cmd::SET_COM_SCAN_INC],
            &[cmd::SET_COM_PINS, 0x12],
            &[cmd::SET_CONTRAST, self.contrast],
            &[cmd::SET_VCOM_DESELECT, 0x00],
            &[cmd::ENTIRE_DISPLAY_RESUME],
            &[cmd::SET_NORMAL],
            &[cmd::DISPLAY_ON],
        ];
        for payload in init_seq {
            self.command(payload).await?;
        }
        self.power.mark_on();
        log::info!(
            "display initialized: {}x{}, {} pages",
            self.config.columns,
            self.config.rows,
            self.max_page + 1
        );
        Ok(())
    }

    /// Send one command payload (opcode + arguments).
    pub(crate) async fn command(&mut self, payload: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = heapless::Vec::<u8, 8>::new();
        let _ = buf.push(cmd::CONTROL_COMMAND);
        let _ = buf.extend_from_slice(payload);
        self.i2c.write(self.address, &buf).await
    }

    /// Send one data chunk.
    pub(crate) async fn data(&mut self, chunk: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = heapless::Vec::<u8, { DATA_CHUNK + 1 }>::new();
        let _ = buf.push(cmd::CONTROL_DATA);
        let _ = buf.extend_from_slice(chunk);
        self.i2c.write(self.address, &buf).await
    }

    /// Column/page window covering the whole panel.
    pub(crate) async fn set_draw_window(&mut self) -> Result<(), I2C::Error> {
        self.command(&[cmd::SET_COLUMN_ADDR, 0, (self.config.columns - 1) as u8])
            .await?;
        self.command(&[cmd::SET_PAGE_ADDR, 0, self.max_page]).await
    }

    /// Record caller activity: wake/undim first, then rearm the idle
    /// deadline. Runs at the top of every drawing/transmission operation.
    async fn activity_reset(&mut self) -> Result<(), I2C::Error> {
        let plan = self.power.activity();
        self.apply_plan(plan).await
    }

    /// The idle deadline passed; let the machine move toward Dim/Sleep.
    pub async fn on_idle_timeout(&mut self) -> Result<(), I2C::Error> {
        let plan = self.power.idle_elapsed(self.contrast);
        self.apply_plan(plan).await
    }

    async fn apply_plan(&mut self, plan: PowerPlan) -> Result<(), I2C::Error> {
        for action in plan.actions {
            match action {
                PowerAction::PanelOn => self.command(&[cmd::DISPLAY_ON]).await?,
                PowerAction::PanelOff => self.command(&[cmd::DISPLAY_OFF]).await?,
                PowerAction::FadeTo(target) => self.fade_to(target).await?,
            }
        }
        match plan.timer {
            TimerOp::Restart(secs) => {
                self.deadline = Some(Instant::now() + Duration::from_secs(secs as u64));
            }
            TimerOp::Stop => self.deadline = None,
            TimerOp::Keep => {}
        }
        Ok(())
    }

    /// Step the live contrast one unit at a time toward `target`, one
    /// device command plus one delay per step. Blocking for the caller;
    /// not cancellable mid-fade.
    async fn fade_to(&mut self, target: u8) -> Result<(), I2C::Error> {
        let delta = (self.contrast as i32 - target as i32).unsigned_abs();
        if delta == 0 {
            return Ok(());
        }
        let step_delay = Duration::from_millis((FADE_BUDGET_MS / delta) as u64);
        log::debug!("fading contrast {} -> {}", self.contrast, target);
        while self.contrast != target {
            self.contrast = if self.contrast > target {
                self.contrast - 1
            } else {
                self.contrast + 1
            };
            let value = self.contrast;
            self.command(&[cmd::SET_CONTRAST, value]).await?;
            Timer::after(step_delay).await;
        }
        Ok(())
    }

    /// Fade to a brightness percentage (clamped to 0-100).
    pub async fn set_contrast(&mut self, percentage: u8) -> Result<(), I2C::Error> {
        let percentage = percentage.min(100);
        let target = ((percentage as u32 * 255 + 50) / 100) as u8;
        log::info!("set contrast to {target} ({percentage}%)");
        self.fade_to(target).await
    }

    /// Transmit the framebuffer: addressing window, then 16-byte chunks.
    pub async fn send_buffer(&mut self) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        self.set_draw_window().await?;
        let bytes = self.frame.bytes().to_vec();
        for chunk in bytes.chunks(DATA_CHUNK) {
            self.data(chunk).await?;
        }
        Ok(())
    }

    /// Zero the framebuffer without transmitting.
    pub fn clear_buffer(&mut self) {
        self.frame.clear();
    }

    /// Clear the framebuffer and push the blank frame to the panel.
    pub async fn clear_screen(&mut self) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        self.frame.clear();
        self.send_buffer().await
    }

    /// Pack a pre-rendered glyph canvas and transmit it, bypassing the
    /// framebuffer.
    pub async fn display_canvas(&mut self, canvas: &GlyphCanvas) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        self.set_draw_window().await?;
        let packed = text::pack_canvas(canvas, self.max_page as usize + 1);
        for chunk in packed.chunks(DATA_CHUNK) {
            self.data(chunk).await?;
        }
        Ok(())
    }

    /// Render a message with the configured font and push it to the panel.
    pub async fn send_message(&mut self, message: &str) -> Result<(), I2C::Error> {
        let size = self.config.font.size;
        self.send_message_sized(message, size).await
    }

    /// Render a message at an explicit nominal font size.
    pub async fn send_message_sized(&mut self, message: &str, size: u32) -> Result<(), I2C::Error> {
        log::info!("message ({size}px): {message:?}");
        let font = self.fonts.select(self.config.font.family.as_str(), size);
        let canvas = text::render_message(self.config.columns, self.config.rows, message, font);
        self.display_canvas(&canvas).await
    }

    /// Set or clear a single pixel (1-indexed, out of range is dropped).
    pub async fn set_pixel(&mut self, x: i32, y: i32, on: bool) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        self.frame.set_pixel(x, y, on);
        Ok(())
    }

    pub async fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_line: ({x0},{y0})-({x1},{y1})");
        raster::line(&mut self.frame, x0, y0, x1, y1);
        Ok(())
    }

    pub async fn draw_horizontal_line(&mut self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        raster::horizontal_line(&mut self.frame, x, y, w);
        Ok(())
    }

    pub async fn draw_vertical_line(&mut self, x: i32, y: i32, h: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        raster::vertical_line(&mut self.frame, x, y, h);
        Ok(())
    }

    pub async fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_rectangle: x({x}), y({y}), w({w}), h({h})");
        raster::rectangle(&mut self.frame, x, y, w, h);
        Ok(())
    }

    pub async fn draw_filled_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_filled_rectangle: x({x}), y({y}), w({w}), h({h})");
        raster::filled_rectangle(&mut self.frame, x, y, w, h);
        Ok(())
    }

    pub async fn draw_square(&mut self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        self.draw_rectangle(x, y, w, w).await
    }

    pub async fn draw_filled_square(&mut self, x: i32, y: i32, w: i32) -> Result<(), I2C::Error> {
        self.draw_filled_rectangle(x, y, w, w).await
    }

    pub async fn draw_circle(&mut self, x: i32, y: i32, r: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_circle: x({x}), y({y}), r({r})");
        raster::circle(&mut self.frame, x, y, r);
        Ok(())
    }

    pub async fn draw_filled_circle(&mut self, x: i32, y: i32, r: i32) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_filled_circle: x({x}), y({y}), r({r})");
        raster::filled_circle(&mut self.frame, x, y, r);
        Ok(())
    }

    pub async fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_triangle: ({x0},{y0}) ({x1},{y1}) ({x2},{y2})");
        raster::triangle(&mut self.frame, x0, y0, x1, y1, x2, y2);
        Ok(())
    }

    /// Triangle centered on `(cx, cy)`, apex up.
    pub async fn draw_triangle_about(
        &mut self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        raster::triangle_about(&mut self.frame, cx, cy, w, h);
        Ok(())
    }

    pub async fn draw_filled_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        log::debug!("draw_filled_triangle: ({x0},{y0}) ({x1},{y1}) ({x2},{y2})");
        raster::filled_triangle(&mut self.frame, x0, y0, x1, y1, x2, y2);
        Ok(())
    }

    /// Filled triangle centered on `(cx, cy)`, apex up.
    pub async fn draw_filled_triangle_about(
        &mut self,
        cx: i32,
        cy: i32,
        w: i32,
        h: i32,
    ) -> Result<(), I2C::Error> {
        self.activity_reset().await?;
        raster::filled_triangle_about(&mut self.frame, cx, cy, w, h);
        Ok(())
    }

    /// Corner/center diagnostic pattern, transmitted immediately.
    pub async fn draw_test_pattern(&mut self) -> Result<(), I2C::Error> {
        log::info!("display: test pattern");
        self.activity_reset().await?;
        raster::test_pattern(&mut self.frame);
        self.send_buffer().await
    }

    /// Final message, then hand the bus back. There is no async Drop; this
    /// is the supported teardown path.
    pub async fn shutdown(mut self) -> Result<I2C, I2C::Error> {
        log::info!("display shutting down");
        self.send_message(SHUTDOWN_MESSAGE).await?;
        Ok(self.i2c)
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// Live contrast byte.
    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    /// When the idle timer would next fire, if armed.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the armed deadline has passed.
    pub fn idle_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|at| now >= at)
    }

    /// Read access to the framebuffer.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub(crate) fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Panel configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub(crate) fn max_page(&self) -> u8 {
        self.max_page
    }

    #[cfg(test)]
    pub(crate) fn bus(&mut self) -> &mut I2C {
        &mut self.i2c
    }
}
