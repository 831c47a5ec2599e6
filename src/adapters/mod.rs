//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                       | Connects to          |
//! |-------------|----------------------------------|----------------------|
//! | `hardware`  | AnalogPort, LevelPort, BiasPort, | ESP32 ADC1, GPIO,    |
//! |             | EdgeWatcher, IndicatorPort,      | GPIO ISR, ROM delay  |
//! |             | DelayNs                          |                      |
//! | `log_sink`  | EventSink                        | Serial log output    |

pub mod hardware;
pub mod log_sink;
