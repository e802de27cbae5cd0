mod control_flow;
mod declarations;
mod environments;
mod expressions;
mod generics;
