// Two tiers: public routes need nothing; protected routes need a bearer token
// and pass the authorization gate.
pub mod protected;
pub mod public;
