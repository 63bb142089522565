pub mod costing;
