//! Link variants dispatched through [`HeadLossLaw`].

use crate::common::HeadLoss;
use crate::pipe::Pipe;
use crate::pump::Pump;
use crate::traits::HeadLossLaw;
use crate::valve::Valve;
use hf_core::units::{Area, Flow};

#[derive(Debug, Clone, PartialEq)]
pub enum LinkKind {
    Pipe(Pipe),
    Pump(Pump),
    Valve(Valve),
}

impl LinkKind {
    /// Lower-case type tag used in results and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            LinkKind::Pipe(_) => "pipe",
            LinkKind::Pump(_) => "pump",
            LinkKind::Valve(_) => "valve",
        }
    }

    fn law(&self) -> &dyn HeadLossLaw {
        match self {
            LinkKind::Pipe(p) => p,
            LinkKind::Pump(p) => p,
            LinkKind::Valve(v) => v,
        }
    }
}

impl HeadLossLaw for LinkKind {
    fn headloss(&self, flow: Flow) -> HeadLoss {
        self.law().headloss(flow)
    }

    fn flow_area(&self) -> Option<Area> {
        self.law().flow_area()
    }

    fn is_closed(&self) -> bool {
        self.law().is_closed()
    }
}
