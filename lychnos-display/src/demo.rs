//! Scripted diagnostics: the primitive-exercise demo, the alien bitmaps
//! and the repeating clock.

use core::fmt::Write;

use embassy_time::{Instant, Timer};
use embedded_hal_async::i2c::I2c;

use lychnos_core::raster;

use crate::cmd;
use crate::icons;
use crate::ssd1306::Ssd1306;

/// Frames rendered by one `display_clock` call.
const CLOCK_FRAMES: u32 = 100;
/// Nominal font size for the clock digits.
const CLOCK_FONT_SIZE: u32 = 25;

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Exercise every primitive once, with pauses so the result is
    /// watchable on the panel.
    pub async fn demo(&mut self) -> Result<(), I2C::Error> {
        let c = self.config().columns as i32;
        let r = self.config().rows as i32;
        let max_page = self.max_page();

        // rows of icons, page by page
        self.clear_screen().await?;
        self.command(&[cmd::SET_COLUMN_ADDR, 0, (c - 1) as u8]).await?;
        let faces = [icons::SKULL, icons::HEART, icons::CLOCK_FACE];
        for page in 0..=max_page {
            self.command(&[cmd::SET_PAGE_ADDR, page, max_page]).await?;
            for i in 0..15 {
                self.data(&faces[i % faces.len()]).await?;
                Timer::after_millis(30).await;
            }
            self.clear_screen().await?;
            Timer::after_millis(100).await;
        }

        self.clear_screen().await?;
        self.draw_test_pattern().await?;
        Timer::after_millis(1000).await;

        // squares filling the screen, then filled over
        self.clear_screen().await?;
        let square_grid = [
            (1, 1),
            (32, 1),
            (64, 1),
            (96, 1),
            (1, 32),
            (32, 32),
            (64, 32),
            (96, 32),
        ];
        for (x, y) in square_grid {
            self.draw_square(x, y, 32).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;
        for (x, y) in square_grid {
            self.draw_filled_square(x, y, 32).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;

        // rectangles, stroked then filled
        self.clear_screen().await?;
        for x in [1, 32, 64, 96] {
            self.draw_rectangle(x, 1, 32, 64).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;
        for x in [1, 32, 64, 96] {
            self.draw_filled_rectangle(x, 1, 32, 64).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;

        // horizontal lines
        for x in [1, 64] {
            self.clear_screen().await?;
            for y in [1, 32, 64] {
                self.draw_horizontal_line(x, y, 64).await?;
                self.send_buffer().await?;
            }
            Timer::after_millis(1000).await;
        }

        // vertical lines
        for y in [1, 32] {
            self.clear_screen().await?;
            for x in [1, 32, 64, 96, 128] {
                self.draw_vertical_line(x, y, 32).await?;
                self.send_buffer().await?;
            }
            Timer::after_millis(1000).await;
        }

        // the full grid at once
        self.clear_screen().await?;
        for x in [1, 64] {
            for y in [1, 32, 64] {
                self.draw_horizontal_line(x, y, 64).await?;
            }
        }
        for y in [1, 32] {
            for x in [1, 32, 64, 96, 128] {
                self.draw_vertical_line(x, y, 32).await?;
            }
        }
        self.send_buffer().await?;
        Timer::after_millis(1000).await;

        // triangles, stroked then filled
        self.clear_screen().await?;
        self.triangle_script(false, c, r).await?;
        self.triangle_script(true, c, r).await?;

        // circles, stroked then filled
        self.clear_screen().await?;
        let circles = [(c / 2, r / 2, r / 4), (1, 1, r / 2), (c, r, r / 2)];
        for (x, y, radius) in circles {
            self.draw_circle(x, y, radius).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;
        for (x, y, radius) in circles {
            self.draw_filled_circle(x, y, radius).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;

        // a bit of everything
        self.clear_screen().await?;
        self.draw_triangle_about(c / 2, r / 2, r / 4, r / 4).await?;
        self.send_buffer().await?;
        Timer::after_millis(500).await;
        self.draw_square(c / 2 - r / 8, r / 2 - r / 8, r / 4).await?;
        self.send_buffer().await?;
        Timer::after_millis(500).await;
        for (x, y) in [(1, 1), (c, r)] {
            self.draw_circle(x, y, r / 2).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        for (x, y) in [(c - r / 4, 1 - r / 4), (1 - r / 4, r - r / 4)] {
            self.draw_square(x, y, r / 2).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        let edges = [
            (1, 1, c, 1),
            (c, 1, c, r),
            (c, r, 1, r),
            (1, r, 1, 1),
            (1, 1, c, r),
            (c, 1, 1, r),
        ];
        for (x0, y0, x1, y1) in edges {
            self.draw_line(x0, y0, x1, y1).await?;
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }

        self.draw_test_pattern().await?;
        Timer::after_millis(1000).await;
        Ok(())
    }

    async fn triangle_script(&mut self, filled: bool, c: i32, r: i32) -> Result<(), I2C::Error> {
        let s = r / 4;
        let centered = [
            (c / 2, r / 2, s, s),
            (1, 1, r / 2, r / 2),
            (1, r, r / 2, r / 2),
            (c, 1, r / 2, r / 2),
            (c, r, r / 2, r / 2),
            (c / 2, r / 2, r, r),
        ];
        for (cx, cy, w, h) in centered {
            if filled {
                self.draw_filled_triangle_about(cx, cy, w, h).await?;
            } else {
                self.draw_triangle_about(cx, cy, w, h).await?;
            }
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        let explicit = [
            (c / 2 - s / 2, r / 2 - s / 2, c / 2 + s / 2, r / 2 - s / 2, c / 2, r / 2 + s / 2),
            (1, 1, c, 1, c / 2, r),
        ];
        for (x0, y0, x1, y1, x2, y2) in explicit {
            if filled {
                self.draw_filled_triangle(x0, y0, x1, y1, x2, y2).await?;
            } else {
                self.draw_triangle(x0, y0, x1, y1, x2, y2).await?;
            }
            self.send_buffer().await?;
            Timer::after_millis(500).await;
        }
        Timer::after_millis(500).await;
        Ok(())
    }

    /// The two built-in alien frames: dark-on-light, then light-on-dark.
    pub async fn display_alien(&mut self) -> Result<(), I2C::Error> {
        self.alien_frame(true).await?;
        Timer::after_millis(1000).await;
        self.alien_frame(false).await
    }

    async fn alien_frame(&mut self, dark_on_light: bool) -> Result<(), I2C::Error> {
        let columns = self.config().columns as i32;
        let rows = self.config().rows as i32;
        let scale = (columns / icons::ALIEN_COLS as i32)
            .min(rows / icons::ALIEN_ROWS as i32)
            .max(1);
        let width = icons::ALIEN_COLS as i32 * scale;
        let height = icons::ALIEN_ROWS as i32 * scale;
        let origin_x = (columns - width) / 2 + 1;
        let origin_y = (rows - height) / 2 + 1;

        self.clear_buffer();
        for (row, bits) in icons::ALIEN.iter().enumerate() {
            for col in 0..icons::ALIEN_COLS {
                if bits & (1 << (icons::ALIEN_COLS - 1 - col)) != 0 {
                    raster::filled_rectangle(
                        self.frame_mut(),
                        origin_x + col as i32 * scale,
                        origin_y + row as i32 * scale,
                        scale,
                        scale,
                    );
                }
            }
        }
        if dark_on_light {
            self.frame_mut().invert();
        }
        self.send_buffer().await
    }

    /// Render the current time repeatedly, as fast as the bus allows.
    pub async fn display_clock(&mut self) -> Result<(), I2C::Error> {
        self.clear_screen().await?;
        for _ in 0..CLOCK_FRAMES {
            let secs = Instant::now().as_secs();
            let mut stamp: heapless::String<8> = heapless::String::new();
            let _ = write!(
                stamp,
                "{:02}:{:02}:{:02}",
                secs / 3600 % 24,
                secs / 60 % 60,
                secs % 60
            );
            self.send_message_sized(&stamp, CLOCK_FONT_SIZE).await?;
        }
        Ok(())
    }
}
