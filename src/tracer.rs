//! Exposes testing, profiling and tracing capabilities for reconciliation.

use crate::Entity;

/// Defines the [`Tracer`] trait and implements the [`Log`] and [`Aggregate`] types.
///
/// All tracer method parameters must be [`Copy`].
macro_rules! define_tracer {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident(&self $(, $arg_ident:ident: $arg_ty:ty)* $(,)?);
        )*
    ) => {
        /// Receives the events of [`Registry::update_traced`](crate::Registry::update_traced).
        ///
        /// All methods default to no-ops.
        pub trait Tracer {
            $(
                $(#[$meta])*
                #[allow(unused_variables)]
                fn $name(&self, $($arg_ident: $arg_ty,)*) {}
            )*
        }

        impl Tracer for Log {
            $(
                fn $name(&self, $($arg_ident: $arg_ty,)*) {
                    log::log!(self.0, concat!(stringify!($name), "(", $(
                        stringify!($arg_ident),
                        " = {:?}, ",
                    )* ")"), $($arg_ident,)*);
                }
            )*
        }

        impl_tuple_accumulate! {
            @TYPES (T1, T2, T3, T4, T5, T6, T7, T8);
            $(
                @VARS (t1, t2, t3, t4, t5, t6, t7, t8);
                @METHOD {fn $name(&self, $($arg_ident: $arg_ty,)*);}
            )*
        }
    };
}

macro_rules! impl_tuple {
    (
        @TYPES ($($ty:ident),* $(,)?);
        $(
            @VARS ($($vars:ident),* $(,)?);
            @METHOD {fn $name:ident(&self, $($arg_ident:ident: $arg_ty:ty,)*);}
        )*
    ) => {
        impl<$($ty: Tracer),*> Tracer for Aggregate<($($ty,)*)> {
            $(
                fn $name(&self, $($arg_ident: $arg_ty),*) {
                    #[allow(unused_variables)]
                    let args = ($($arg_ident,)*);

                    #[allow(dead_code)]
                    fn call_with_args(tracer: &impl Tracer, ($($arg_ident,)*): ($($arg_ty,)*)) {
                        tracer.$name($($arg_ident,)*);
                    }

                    let Aggregate(($($vars,)*)) = self;
                    $(
                        call_with_args($vars, args);
                    )*
                }
            )*
        }
    };
}

macro_rules! impl_tuple_accumulate {
    (@TYPES (); $(@VARS (); @METHOD {$($body:tt)*})*) => {
        impl_tuple! {
            @TYPES ();
            $(
                @VARS ();
                @METHOD {$($body)*}
            )*
        }
    };
    (
        @TYPES ($first_ty:ident $(, $rest_ty:ident)* $(,)?);
        $(
            @VARS ($first_var:ident $(, $rest_var:ident)* $(,)?);
            @METHOD {$($body:tt)*}
        )*
    ) => {
        impl_tuple! {
            @TYPES ($first_ty $(, $rest_ty)* );
            $(
                @VARS ($first_var $(, $rest_var)*);
                @METHOD {$($body)*}
            )*
        }

        impl_tuple_accumulate! {
            @TYPES ($($rest_ty),*);
            $(
                @VARS ($($rest_var),*);
                @METHOD {$($body)*}
            )*
        }
    };
}

define_tracer! {
    /// A reconciliation starts.
    fn start_update(&self);

    /// A reconciliation ends.
    fn end_update(&self, activated: usize, killed: usize, reevaluated: usize);

    /// An entity queued for destruction is destroyed.
    fn kill(&self, entity: Entity);

    /// A newly created entity becomes visible to systems.
    fn activate(&self, entity: Entity);

    /// An active entity is re-evaluated because its components changed.
    fn reevaluate(&self, entity: Entity);

    /// A system registered since the last reconciliation is populated.
    fn backfill(&self, system: &str);

    /// An entity joins the membership of a system.
    fn admit(&self, entity: Entity, system: &str);

    /// An entity leaves the membership of a system.
    fn evict(&self, entity: Entity, system: &str);
}

/// An empty tracer.
pub struct Noop;

impl Tracer for Noop {}

/// Groups multiple tracers into a tuple and dispatches each call to them in serial.
pub struct Aggregate<T>(
    /// A tuple of child tracers to execute in serial.
    pub T,
);

/// A tracer that logs all events.
pub struct Log(
    /// The log level to log events with.
    pub log::Level,
);
