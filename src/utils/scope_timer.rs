// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::time::{Duration, Instant};

/// Measures a scope and traces its duration when dropped.
pub struct ScopeTimer<'a> {
    name: &'a str,
    start_time: Instant,
}

impl<'a> ScopeTimer<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }
}

impl Drop for ScopeTimer<'_> {
    fn drop(&mut self) {
        log::trace!("{} took {:.2?}", self.name, self.elapsed());
    }
}
