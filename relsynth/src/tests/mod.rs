// Operator semantics
mod semantics;

// Witness rules
mod memo;
mod pattern_search;

// Relational properties and lattice bookkeeping
mod conflicts;
mod properties;
