//! Macros for declaring closed sets of states and events.

/// Declare a fieldless state enum that is its own kind.
///
/// # Example
///
/// ```
/// use cadence::core::State;
/// use cadence::state_enum;
///
/// state_enum! {
///     pub enum WorkflowState {
///         Start,
///         Processing,
///         Done,
///     }
///     final: [Done]
/// }
///
/// assert_eq!(WorkflowState::Processing.name(), "Processing");
/// assert!(WorkflowState::Done.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            type Kind = Self;

            fn kind(&self) -> Self {
                *self
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Declare a fieldless event enum that is its own kind.
///
/// # Example
///
/// ```
/// use cadence::core::Event;
/// use cadence::event_enum;
///
/// event_enum! {
///     pub enum Command {
///         Start,
///         Stop,
///     }
/// }
///
/// assert_eq!(Command::Stop.name(), "Stop");
/// assert_eq!(Command::Start.kind(), Command::Start);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            type Kind = Self;

            fn kind(&self) -> Self {
                *self
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};

    state_enum! {
        enum Light {
            Red,
            Green,
            Off,
        }
        final: [Off]
    }

    state_enum! {
        enum Endless {
            Ping,
            Pong,
        }
    }

    event_enum! {
        enum Tick {
            Advance,
            PowerDown,
        }
    }

    #[test]
    fn state_enum_names_variants() {
        assert_eq!(Light::Red.name(), "Red");
        assert_eq!(Light::Green.name(), "Green");
        assert_eq!(Light::Off.kind(), Light::Off);
    }

    #[test]
    fn state_enum_marks_final_states() {
        assert!(Light::Off.is_final());
        assert!(!Light::Red.is_final());
        assert!(!Endless::Ping.is_final());
        assert!(!Endless::Pong.is_final());
    }

    #[test]
    fn event_enum_names_variants() {
        assert_eq!(Tick::Advance.name(), "Advance");
        assert_eq!(Tick::PowerDown.kind(), Tick::PowerDown);
    }
}
